//! Catalog provider adapters with a trait-based plugin architecture.
//!
//! Each external catalog gets one adapter that maps its native response into
//! canonical [`Book`] records. Adapters never surface errors to the caller of
//! [`Provider::search`]: any transport or parse failure is logged and
//! converted into an empty [`ProviderResult`] carrying the cause.

mod douban;
mod google_books;
pub mod mock;
mod open_library;
mod registry;

pub use douban::DoubanProvider;
pub use google_books::GoogleBooksProvider;
pub use mock::MockProvider;
pub use open_library::OpenLibraryProvider;
pub use registry::ProviderRegistry;

use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::models::{Book, ProviderResult, SourceType};

/// Script family a provider's catalog primarily serves. Drives the per-family
/// quota split in the fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageFamily {
    Latin,
    Cjk,
}

/// Errors that can occur inside a provider adapter. These never cross the
/// [`Provider::search`] boundary; they are folded into [`ProviderResult`].
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Payload could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// The provider's API returned a failure status
    #[error("API error: {0}")]
    Api(String),

    /// The provider-local time budget expired
    #[error("Provider timed out")]
    Timeout,

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(format!("JSON: {}", err))
    }
}

/// The Provider trait defines the interface for all catalog adapters.
///
/// Implementors supply [`Provider::fetch`]; the error-free [`Provider::search`]
/// wrapper adds timing, logging, and failure conversion and is what the
/// orchestrator calls.
#[async_trait]
pub trait Provider: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this provider ("google_books", "douban", ...)
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Source tag stamped onto records from this provider
    fn source(&self) -> SourceType;

    /// Script family this catalog primarily serves
    fn language_family(&self) -> LanguageFamily;

    /// Whether this provider's community ratings are considered higher-trust
    fn trusted_ratings(&self) -> bool {
        false
    }

    /// Time budget the orchestrator grants a single call to this provider.
    /// Known-flaky providers return a shorter budget.
    fn call_timeout(&self) -> Duration {
        Duration::from_secs(8)
    }

    /// Fetch and map the provider's native response. Fallible; wrapped by
    /// [`Provider::search`].
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Book>, ProviderError>;

    /// Error-free search entry point: times the call, logs failures, and
    /// always returns a [`ProviderResult`].
    async fn search(&self, query: &str, limit: usize) -> ProviderResult {
        let started = Instant::now();
        match self.fetch(query, limit).await {
            Ok(books) => {
                let elapsed = started.elapsed().as_millis() as u64;
                tracing::debug!(
                    provider = self.id(),
                    count = books.len(),
                    elapsed_ms = elapsed,
                    "provider search completed"
                );
                ProviderResult::ok(self.source(), books, elapsed)
            }
            Err(e) => {
                let elapsed = started.elapsed().as_millis() as u64;
                tracing::warn!(
                    provider = self.id(),
                    elapsed_ms = elapsed,
                    error = %e,
                    "provider search failed"
                );
                ProviderResult::failed(self.source(), e.to_string(), elapsed)
            }
        }
    }
}

/// Upgrade an insecure image URL to https. Providers routinely hand out
/// `http://` thumbnails that break embedding pages.
pub(crate) fn secure_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("http://") {
        format!("https://{}", rest)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_url() {
        assert_eq!(
            secure_url("http://example.com/cover.jpg"),
            "https://example.com/cover.jpg"
        );
        assert_eq!(
            secure_url("https://example.com/cover.jpg"),
            "https://example.com/cover.jpg"
        );
    }

    #[tokio::test]
    async fn test_search_never_errors() {
        // A failing fetch must still come back as a ProviderResult
        #[derive(Debug)]
        struct Broken;

        #[async_trait]
        impl Provider for Broken {
            fn id(&self) -> &str {
                "broken"
            }
            fn name(&self) -> &str {
                "Broken"
            }
            fn source(&self) -> SourceType {
                SourceType::Other("broken".to_string())
            }
            fn language_family(&self) -> LanguageFamily {
                LanguageFamily::Latin
            }
            async fn fetch(&self, _query: &str, _limit: usize) -> Result<Vec<Book>, ProviderError> {
                Err(ProviderError::Api("boom".to_string()))
            }
        }

        let result = Broken.search("anything", 10).await;
        assert!(result.books.is_empty());
        assert!(result.error.as_deref().unwrap().contains("boom"));
    }
}
