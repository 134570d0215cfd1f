//! Mock provider for testing the pipeline without network access.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::models::{Book, SourceType};
use crate::providers::{LanguageFamily, Provider, ProviderError};

/// A mock provider returning canned books, with optional injected latency
/// and forced failure. Counts calls so tests can assert that a cache hit
/// issued zero provider requests.
#[derive(Debug)]
pub struct MockProvider {
    id: String,
    family: LanguageFamily,
    trusted: bool,
    books: Mutex<Vec<Book>>,
    latency: Mutex<Option<Duration>>,
    fail_with: Mutex<Option<String>>,
    calls: AtomicUsize,
    completions: AtomicUsize,
}

impl MockProvider {
    /// Create a mock provider with the given id and canned books
    pub fn new(id: impl Into<String>, books: Vec<Book>) -> Self {
        Self {
            id: id.into(),
            family: LanguageFamily::Latin,
            trusted: false,
            books: Mutex::new(books),
            latency: Mutex::new(None),
            fail_with: Mutex::new(None),
            calls: AtomicUsize::new(0),
            completions: AtomicUsize::new(0),
        }
    }

    /// Set the script family the mock serves
    pub fn family(mut self, family: LanguageFamily) -> Self {
        self.family = family;
        self
    }

    /// Mark the mock's ratings as higher-trust
    pub fn trusted(mut self) -> Self {
        self.trusted = true;
        self
    }

    /// Inject latency before every response
    pub fn latency(self, latency: Duration) -> Self {
        *self.latency.lock().unwrap() = Some(latency);
        self
    }

    /// Force every call to fail with the given message
    pub fn failing(self, message: impl Into<String>) -> Self {
        *self.fail_with.lock().unwrap() = Some(message.into());
        self
    }

    /// Replace the canned books
    pub fn set_books(&self, books: Vec<Book>) {
        *self.books.lock().unwrap() = books;
    }

    /// Number of fetch calls made against this mock
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of fetch calls that ran to completion. Stays behind
    /// [`MockProvider::call_count`] when an in-flight call was cancelled.
    pub fn completed_count(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Mock Provider"
    }

    fn source(&self) -> SourceType {
        SourceType::Other(self.id.clone())
    }

    fn language_family(&self) -> LanguageFamily {
        self.family
    }

    fn trusted_ratings(&self) -> bool {
        self.trusted
    }

    async fn fetch(&self, _query: &str, limit: usize) -> Result<Vec<Book>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        self.completions.fetch_add(1, Ordering::SeqCst);

        let fail = self.fail_with.lock().unwrap().clone();
        if let Some(message) = fail {
            return Err(ProviderError::Api(message));
        }

        let books = self.books.lock().unwrap();
        Ok(books.iter().take(limit).cloned().collect())
    }
}

/// Helper to build a minimal book for tests
pub fn make_book(native_id: &str, title: &str, source: SourceType) -> Book {
    Book::new(native_id, title, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_counts_calls() {
        let mock = MockProvider::new("mock", vec![make_book("1", "A", SourceType::GoogleBooks)]);
        assert_eq!(mock.call_count(), 0);
        let _ = mock.search("q", 10).await;
        let _ = mock.search("q", 10).await;
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_failure_folds_into_result() {
        let mock = MockProvider::new("mock", vec![]).failing("down");
        let result = mock.search("q", 10).await;
        assert!(result.books.is_empty());
        assert!(result.error.as_deref().unwrap().contains("down"));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_respects_limit() {
        let mock = MockProvider::new(
            "mock",
            (0..10)
                .map(|i| make_book(&i.to_string(), "T", SourceType::OpenLibrary))
                .collect(),
        );
        let result = mock.search("q", 3).await;
        assert_eq!(result.books.len(), 3);
    }
}
