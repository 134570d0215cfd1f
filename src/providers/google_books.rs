//! Google Books volumes API adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{Book, BookBuilder, SourceType};
use crate::providers::{secure_url, LanguageFamily, Provider, ProviderError};

const GOOGLE_BOOKS_API_BASE: &str = "https://www.googleapis.com/books/v1";

/// Google Books provider. Ratings from this catalog are treated as
/// higher-trust by the scorer.
#[derive(Debug, Clone)]
pub struct GoogleBooksProvider {
    client: Arc<Client>,
    api_key: Option<String>,
}

impl GoogleBooksProvider {
    /// Create a new Google Books provider
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                Client::builder()
                    .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                    .timeout(Duration::from_secs(8))
                    .build()
                    .unwrap_or_default(),
            ),
            api_key: std::env::var("GOOGLE_BOOKS_API_KEY").ok(),
        }
    }

    fn build_search_url(&self, query: &str, limit: usize) -> String {
        // The volumes endpoint caps maxResults at 40
        let mut url = format!(
            "{}/volumes?q={}&maxResults={}&printType=books",
            GOOGLE_BOOKS_API_BASE,
            urlencoding::encode(query),
            limit.min(40)
        );
        if let Some(ref key) = self.api_key {
            url = format!("{}&key={}", url, urlencoding::encode(key));
        }
        url
    }

    fn parse_volume(volume: &Volume) -> Option<Book> {
        let info = volume.volume_info.as_ref()?;
        let title = info.title.as_deref()?.trim();
        if title.is_empty() {
            return None;
        }

        let mut builder = BookBuilder::new(&volume.id, title, SourceType::GoogleBooks)
            .authors(info.authors.clone().unwrap_or_default());

        if let Some(ref description) = info.description {
            builder = builder.description(description.clone());
        }
        if let Some(ref language) = info.language {
            builder = builder.language(language.clone());
        }
        if let Some(ref links) = info.image_links {
            if let Some(thumb) = links.thumbnail.as_ref().or(links.small_thumbnail.as_ref()) {
                builder = builder.thumbnail_url(secure_url(thumb));
            }
        }
        if let Some(rating) = info.average_rating {
            builder = builder.average_rating(rating);
        }
        if let Some(count) = info.ratings_count {
            builder = builder.ratings_count(count);
        }
        if let Some(ref date) = info.published_date {
            builder = builder.published_date(date.clone());
        }
        if let Some(ref publisher) = info.publisher {
            builder = builder.publisher(publisher.clone());
        }
        if let Some(ref categories) = info.categories {
            builder = builder.categories(categories.clone());
        }
        Some(builder.build())
    }
}

impl Default for GoogleBooksProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for GoogleBooksProvider {
    fn id(&self) -> &str {
        "google_books"
    }

    fn name(&self) -> &str {
        "Google Books"
    }

    fn source(&self) -> SourceType {
        SourceType::GoogleBooks
    }

    fn language_family(&self) -> LanguageFamily {
        LanguageFamily::Latin
    }

    fn trusted_ratings(&self) -> bool {
        true
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Book>, ProviderError> {
        if query.trim().is_empty() {
            return Err(ProviderError::InvalidRequest("empty query".to_string()));
        }

        let response = self
            .client
            .get(self.build_search_url(query, limit))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "Google Books returned status: {}",
                response.status()
            )));
        }

        let data: VolumesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("Failed to parse volumes JSON: {}", e)))?;

        Ok(data
            .items
            .unwrap_or_default()
            .iter()
            .filter_map(Self::parse_volume)
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    items: Option<Vec<Volume>>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    id: String,
    #[serde(rename = "volumeInfo")]
    volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    description: Option<String>,
    language: Option<String>,
    image_links: Option<ImageLinks>,
    average_rating: Option<f32>,
    ratings_count: Option<u32>,
    published_date: Option<String>,
    publisher: Option<String>,
    categories: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_volume_upgrades_thumbnail() {
        let volume: Volume = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "volumeInfo": {
                "title": "Machine Learning",
                "authors": ["Tom M. Mitchell"],
                "language": "en",
                "imageLinks": { "thumbnail": "http://books.google.com/cover.jpg" },
                "averageRating": 4.5,
                "ratingsCount": 320
            }
        }))
        .unwrap();

        let book = GoogleBooksProvider::parse_volume(&volume).unwrap();
        assert_eq!(book.id, "google_books:abc");
        assert_eq!(
            book.thumbnail_url.as_deref(),
            Some("https://books.google.com/cover.jpg")
        );
        assert_eq!(book.average_rating, Some(4.5));
    }

    #[test]
    fn test_parse_volume_missing_title_dropped() {
        let volume: Volume = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "volumeInfo": { "authors": ["Nobody"] }
        }))
        .unwrap();

        assert!(GoogleBooksProvider::parse_volume(&volume).is_none());
    }

    #[test]
    fn test_build_search_url_caps_limit() {
        let provider = GoogleBooksProvider {
            client: Arc::new(Client::new()),
            api_key: None,
        };
        let url = provider.build_search_url("rust", 100);
        assert!(url.contains("maxResults=40"));
        assert!(url.contains("q=rust"));
    }
}
