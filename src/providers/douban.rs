//! Douban book search adapter (CJK catalog).
//!
//! Douban's suggest endpoint returns most of a book's bibliographic data as a
//! single slash-separated free-text field ("[美] 作者 / 2008 / 出版社"), so
//! this adapter does more text surgery than the others. The endpoint is also
//! known to be slow and flaky, so the client carries a shorter timeout than
//! the orchestrator's budget and expiry is returned gracefully.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{Book, BookBuilder, SourceType};
use crate::providers::{secure_url, LanguageFamily, Provider, ProviderError};

const DOUBAN_API_BASE: &str = "https://book.douban.com";

/// Douban book provider
#[derive(Debug, Clone)]
pub struct DoubanProvider {
    client: Arc<Client>,
}

/// Structured fields recovered from Douban's slash-separated info string
#[derive(Debug, Default, PartialEq)]
struct SubtitleFields {
    authors: Vec<String>,
    year: Option<String>,
    publisher: Option<String>,
}

impl DoubanProvider {
    /// Create a new Douban provider. The client timeout is deliberately
    /// shorter than the orchestrator's per-provider budget.
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                Client::builder()
                    .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                    .timeout(Duration::from_secs(4))
                    .build()
                    .unwrap_or_default(),
            ),
        }
    }

    /// Strip a leading bracketed nationality annotation from an author name:
    /// "[美] Tom Mitchell" -> "Tom Mitchell", "（英）狄更斯" -> "狄更斯".
    fn strip_nationality(author: &str) -> String {
        let trimmed = author.trim();
        for (open, close) in [('[', ']'), ('（', '）'), ('(', ')'), ('〔', '〕'), ('【', '】')] {
            if let Some(rest) = trimmed.strip_prefix(open) {
                if let Some(end) = rest.find(close) {
                    // Nationality tags are short; anything longer is a real name
                    if rest[..end].chars().count() <= 4 {
                        return rest[end + close.len_utf8()..].trim().to_string();
                    }
                }
            }
        }
        trimmed.to_string()
    }

    /// Parse the "author / year / publisher" info string. Segments are
    /// classified by shape: a 4-digit-year-prefixed segment is the year, the
    /// segment after the year (or the last segment) is the publisher,
    /// everything before is authors.
    fn parse_subtitle(info: &str) -> SubtitleFields {
        let segments: Vec<&str> = info
            .split('/')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if segments.is_empty() {
            return SubtitleFields::default();
        }

        let mut fields = SubtitleFields::default();
        let year_pos = segments.iter().position(|s| {
            s.len() >= 4 && s.chars().take(4).all(|c| c.is_ascii_digit())
        });

        match year_pos {
            Some(pos) => {
                fields.year = segments[pos].get(..4).map(|y| y.to_string());
                fields.authors = segments[..pos]
                    .iter()
                    .map(|a| Self::strip_nationality(a))
                    .filter(|a| !a.is_empty())
                    .collect();
                fields.publisher = segments.get(pos + 1).map(|p| p.to_string());
            }
            None if segments.len() >= 2 => {
                fields.publisher = segments.last().map(|p| p.to_string());
                fields.authors = segments[..segments.len() - 1]
                    .iter()
                    .map(|a| Self::strip_nationality(a))
                    .filter(|a| !a.is_empty())
                    .collect();
            }
            None => {
                fields.authors = vec![Self::strip_nationality(segments[0])]
                    .into_iter()
                    .filter(|a| !a.is_empty())
                    .collect();
            }
        }
        fields
    }

    fn parse_item(item: &SuggestItem) -> Option<Book> {
        let title = item.title.as_deref()?.trim();
        if title.is_empty() {
            return None;
        }

        let fields = item
            .info
            .as_deref()
            .map(Self::parse_subtitle)
            .unwrap_or_default();

        let mut builder = BookBuilder::new(&item.id, title, SourceType::Douban)
            .authors(fields.authors)
            .language("zh");

        if let Some(ref summary) = item.summary {
            builder = builder.description(summary.clone());
        }
        if let Some(ref cover) = item.cover_url {
            builder = builder.thumbnail_url(secure_url(cover));
        }
        if let Some(rating) = item.rating.as_ref().and_then(|r| r.average.parse::<f32>().ok()) {
            if rating > 0.0 {
                builder = builder.average_rating(rating);
            }
        }
        if let Some(count) = item.rating.as_ref().and_then(|r| r.num_raters) {
            builder = builder.ratings_count(count);
        }
        if let Some(year) = fields.year {
            builder = builder.published_date(year);
        }
        if let Some(publisher) = fields.publisher {
            builder = builder.publisher(publisher);
        }
        if let Some(ref tags) = item.tags {
            builder = builder.categories(tags.iter().map(|t| t.name.clone()).collect());
        }
        Some(builder.build())
    }
}

impl Default for DoubanProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for DoubanProvider {
    fn id(&self) -> &str {
        "douban"
    }

    fn name(&self) -> &str {
        "Douban"
    }

    fn source(&self) -> SourceType {
        SourceType::Douban
    }

    fn language_family(&self) -> LanguageFamily {
        LanguageFamily::Cjk
    }

    fn call_timeout(&self) -> Duration {
        Duration::from_secs(5)
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Book>, ProviderError> {
        if query.trim().is_empty() {
            return Err(ProviderError::InvalidRequest("empty query".to_string()));
        }

        let url = format!(
            "{}/j/subject_suggest?q={}&count={}",
            DOUBAN_API_BASE,
            urlencoding::encode(query),
            limit
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "Douban returned status: {}",
                response.status()
            )));
        }

        let items: Vec<SuggestItem> = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("Failed to parse suggest JSON: {}", e)))?;

        Ok(items.iter().filter_map(Self::parse_item).collect())
    }
}

#[derive(Debug, Deserialize)]
struct SuggestItem {
    id: String,
    title: Option<String>,
    /// Slash-separated "author / year / publisher" string
    #[serde(rename = "author_name")]
    info: Option<String>,
    #[serde(rename = "pic")]
    cover_url: Option<String>,
    summary: Option<String>,
    rating: Option<Rating>,
    tags: Option<Vec<Tag>>,
}

#[derive(Debug, Deserialize)]
struct Rating {
    #[serde(default)]
    average: String,
    #[serde(rename = "numRaters")]
    num_raters: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_nationality() {
        assert_eq!(DoubanProvider::strip_nationality("[美] Tom Mitchell"), "Tom Mitchell");
        assert_eq!(DoubanProvider::strip_nationality("（英）狄更斯"), "狄更斯");
        assert_eq!(DoubanProvider::strip_nationality("刘慈欣"), "刘慈欣");
        // Long bracketed prefix is a real name part, not a nationality tag
        assert_eq!(
            DoubanProvider::strip_nationality("[A Very Long Prefix] X"),
            "[A Very Long Prefix] X"
        );
    }

    #[test]
    fn test_parse_subtitle_full() {
        let fields = DoubanProvider::parse_subtitle("[美] Tom Mitchell / 2003-1 / 机械工业出版社");
        assert_eq!(fields.authors, vec!["Tom Mitchell"]);
        assert_eq!(fields.year.as_deref(), Some("2003"));
        assert_eq!(fields.publisher.as_deref(), Some("机械工业出版社"));
    }

    #[test]
    fn test_parse_subtitle_two_authors() {
        let fields = DoubanProvider::parse_subtitle("刘慈欣 / 王晋康 / 2008 / 重庆出版社");
        assert_eq!(fields.authors, vec!["刘慈欣", "王晋康"]);
        assert_eq!(fields.year.as_deref(), Some("2008"));
        assert_eq!(fields.publisher.as_deref(), Some("重庆出版社"));
    }

    #[test]
    fn test_parse_subtitle_no_year() {
        let fields = DoubanProvider::parse_subtitle("刘慈欣 / 重庆出版社");
        assert_eq!(fields.authors, vec!["刘慈欣"]);
        assert_eq!(fields.year, None);
        assert_eq!(fields.publisher.as_deref(), Some("重庆出版社"));
    }

    #[test]
    fn test_parse_subtitle_author_only() {
        let fields = DoubanProvider::parse_subtitle("刘慈欣");
        assert_eq!(fields.authors, vec!["刘慈欣"]);
        assert_eq!(fields.publisher, None);
    }

    #[test]
    fn test_parse_item() {
        let item: SuggestItem = serde_json::from_value(serde_json::json!({
            "id": "2567698",
            "title": "三体",
            "author_name": "刘慈欣 / 2008-1 / 重庆出版社",
            "pic": "http://img1.doubanio.com/s2768378.jpg",
            "rating": { "average": "8.9", "numRaters": 500000 },
            "tags": [{ "name": "科幻" }]
        }))
        .unwrap();

        let book = DoubanProvider::parse_item(&item).unwrap();
        assert_eq!(book.id, "douban:2567698");
        assert_eq!(book.language.as_deref(), Some("zh"));
        assert_eq!(book.authors, vec!["刘慈欣"]);
        assert_eq!(book.published_date.as_deref(), Some("2008"));
        assert!(book.thumbnail_url.as_deref().unwrap().starts_with("https://"));
        assert_eq!(book.categories, vec!["科幻"]);
    }
}
