//! Open Library search API adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{Book, BookBuilder, SourceType};
use crate::providers::{LanguageFamily, Provider, ProviderError};

const OPEN_LIBRARY_API_BASE: &str = "https://openlibrary.org";
const COVERS_BASE: &str = "https://covers.openlibrary.org";

/// Open Library provider
#[derive(Debug, Clone)]
pub struct OpenLibraryProvider {
    client: Arc<Client>,
}

impl OpenLibraryProvider {
    /// Create a new Open Library provider
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                Client::builder()
                    .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                    .timeout(Duration::from_secs(8))
                    .build()
                    .unwrap_or_default(),
            ),
        }
    }

    /// Map Open Library's MARC-ish language codes to the codes the scorer
    /// understands
    fn map_language(codes: &[String]) -> Option<String> {
        for code in codes {
            match code.as_str() {
                "eng" => return Some("en".to_string()),
                "chi" | "zho" | "cmn" => return Some("zh".to_string()),
                _ => {}
            }
        }
        codes.first().cloned()
    }

    fn parse_doc(doc: &SearchDoc) -> Option<Book> {
        let title = doc.title.as_deref()?.trim();
        if title.is_empty() {
            return None;
        }
        // Work keys look like "/works/OL45883W"
        let native_id = doc.key.trim_start_matches("/works/");

        let mut builder = BookBuilder::new(native_id, title, SourceType::OpenLibrary)
            .authors(doc.author_name.clone().unwrap_or_default());

        if let Some(sentence) = doc.first_sentence.as_ref().and_then(|s| s.first()) {
            builder = builder.description(sentence.clone());
        }
        if let Some(lang) = doc.language.as_deref().and_then(Self::map_language) {
            builder = builder.language(lang);
        }
        if let Some(cover_id) = doc.cover_i {
            builder = builder.thumbnail_url(format!("{}/b/id/{}-M.jpg", COVERS_BASE, cover_id));
        }
        if let Some(rating) = doc.ratings_average {
            builder = builder.average_rating(rating);
        }
        if let Some(count) = doc.ratings_count {
            builder = builder.ratings_count(count);
        }
        if let Some(year) = doc.first_publish_year {
            builder = builder.published_date(year.to_string());
        }
        if let Some(publisher) = doc.publisher.as_ref().and_then(|p| p.first()) {
            builder = builder.publisher(publisher.clone());
        }
        if let Some(ref subjects) = doc.subject {
            builder = builder.categories(subjects.iter().take(8).cloned().collect());
        }
        Some(builder.build())
    }
}

impl Default for OpenLibraryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for OpenLibraryProvider {
    fn id(&self) -> &str {
        "open_library"
    }

    fn name(&self) -> &str {
        "Open Library"
    }

    fn source(&self) -> SourceType {
        SourceType::OpenLibrary
    }

    fn language_family(&self) -> LanguageFamily {
        LanguageFamily::Latin
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Book>, ProviderError> {
        if query.trim().is_empty() {
            return Err(ProviderError::InvalidRequest("empty query".to_string()));
        }

        let url = format!(
            "{}/search.json?q={}&limit={}&fields=key,title,author_name,first_publish_year,\
             cover_i,language,publisher,subject,ratings_average,ratings_count,first_sentence",
            OPEN_LIBRARY_API_BASE,
            urlencoding::encode(query),
            limit
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "Open Library returned status: {}",
                response.status()
            )));
        }

        let data: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("Failed to parse search JSON: {}", e)))?;

        Ok(data.docs.iter().filter_map(Self::parse_doc).collect())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    key: String,
    title: Option<String>,
    author_name: Option<Vec<String>>,
    first_publish_year: Option<i32>,
    cover_i: Option<u64>,
    language: Option<Vec<String>>,
    publisher: Option<Vec<String>>,
    subject: Option<Vec<String>>,
    ratings_average: Option<f32>,
    ratings_count: Option<u32>,
    first_sentence: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_doc() {
        let doc: SearchDoc = serde_json::from_value(serde_json::json!({
            "key": "/works/OL45883W",
            "title": "The Pragmatic Programmer",
            "author_name": ["Andrew Hunt", "David Thomas"],
            "first_publish_year": 1999,
            "cover_i": 11403183,
            "language": ["eng", "ger"],
            "publisher": ["Addison-Wesley"],
            "ratings_average": 4.3,
            "ratings_count": 88
        }))
        .unwrap();

        let book = OpenLibraryProvider::parse_doc(&doc).unwrap();
        assert_eq!(book.id, "open_library:OL45883W");
        assert_eq!(book.language.as_deref(), Some("en"));
        assert_eq!(
            book.thumbnail_url.as_deref(),
            Some("https://covers.openlibrary.org/b/id/11403183-M.jpg")
        );
        assert_eq!(book.published_date.as_deref(), Some("1999"));
        assert_eq!(book.publisher.as_deref(), Some("Addison-Wesley"));
    }

    #[test]
    fn test_map_language() {
        assert_eq!(
            OpenLibraryProvider::map_language(&["ger".into(), "chi".into()]),
            Some("zh".to_string())
        );
        assert_eq!(
            OpenLibraryProvider::map_language(&["eng".into()]),
            Some("en".to_string())
        );
        assert_eq!(OpenLibraryProvider::map_language(&[]), None);
    }

    #[test]
    fn test_parse_doc_without_title() {
        let doc: SearchDoc = serde_json::from_value(serde_json::json!({
            "key": "/works/OL1W"
        }))
        .unwrap();
        assert!(OpenLibraryProvider::parse_doc(&doc).is_none());
    }
}
