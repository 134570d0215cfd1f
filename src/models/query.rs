//! Query and result models for the search pipeline.

use serde::{Deserialize, Serialize};

use crate::models::{Book, SourceType};

/// Score reserved to mean "hard excluded"; never surfaces in results.
pub const EXCLUDED_SCORE: i32 = -1000;

/// Softer exclusion floor for fiction queries where a candidate shows no
/// positive evidence of being fiction. Distinct from [`EXCLUDED_SCORE`] but
/// still excluding.
pub const FICTION_FLOOR_SCORE: i32 = -900;

/// Resolved language preference for a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LangPref {
    Zh,
    En,
    Any,
}

impl LangPref {
    /// The language code a strict preference requires, if any
    pub fn code(&self) -> Option<&'static str> {
        match self {
            LangPref::Zh => Some("zh"),
            LangPref::En => Some("en"),
            LangPref::Any => None,
        }
    }
}

/// A planned search query, produced once per incoming request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Raw user text as received
    pub raw: String,

    /// Extracted keywords (1-8 entries)
    pub keywords: Vec<String>,

    /// Whether the query asks for fiction
    pub is_fiction: bool,

    /// Whether a technical query leans theoretical (vs practical/tutorial)
    pub is_theoretical: bool,

    /// Resolved language preference
    pub language: LangPref,

    /// Target number of results for the whole request
    pub max_results: usize,

    /// Provider query variants, strongest first. Always contains at least
    /// the raw topic.
    pub variants: Vec<String>,
}

impl SearchQuery {
    /// Create a minimal query for a raw string (used by tests and callers
    /// that bypass the planner)
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            keywords: vec![raw.clone()],
            variants: vec![raw.clone()],
            raw,
            is_fiction: false,
            is_theoretical: false,
            language: LangPref::Any,
            max_results: 10,
        }
    }

    /// Set max results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set language preference
    pub fn language(mut self, language: LangPref) -> Self {
        self.language = language;
        self
    }

    /// The primary provider query string
    pub fn primary_variant(&self) -> &str {
        self.variants.first().map(|s| s.as_str()).unwrap_or(&self.raw)
    }
}

/// Outcome of one provider call. Always produced, even on failure: a failed
/// or timed-out provider yields empty `books` and a populated `error`.
#[derive(Debug, Clone)]
pub struct ProviderResult {
    /// Provider that produced this result
    pub source: SourceType,

    /// Canonical book records
    pub books: Vec<Book>,

    /// Wall-clock time the call took
    pub elapsed_ms: u64,

    /// Failure cause, if the call did not succeed
    pub error: Option<String>,
}

impl ProviderResult {
    /// A successful result
    pub fn ok(source: SourceType, books: Vec<Book>, elapsed_ms: u64) -> Self {
        Self {
            source,
            books,
            elapsed_ms,
            error: None,
        }
    }

    /// A failed result carrying the cause; contributes no candidates
    pub fn failed(source: SourceType, error: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            source,
            books: Vec::new(),
            elapsed_ms,
            error: Some(error.into()),
        }
    }
}

/// A book paired with its relevance score
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub book: Book,
    pub score: i32,
}

impl ScoredCandidate {
    /// Whether the score is one of the exclusion sentinels
    pub fn is_excluded(&self) -> bool {
        self.score <= FICTION_FLOOR_SCORE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_pref_code() {
        assert_eq!(LangPref::Zh.code(), Some("zh"));
        assert_eq!(LangPref::En.code(), Some("en"));
        assert_eq!(LangPref::Any.code(), None);
    }

    #[test]
    fn test_query_defaults() {
        let q = SearchQuery::new("rust internals").max_results(5);
        assert_eq!(q.max_results, 5);
        assert_eq!(q.primary_variant(), "rust internals");
        assert!(!q.is_fiction);
    }

    #[test]
    fn test_provider_result_failed_is_empty() {
        let r = ProviderResult::failed(SourceType::Douban, "timeout", 1500);
        assert!(r.books.is_empty());
        assert_eq!(r.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_sentinels_exclude() {
        let book = Book::new("1", "T", SourceType::GoogleBooks);
        assert!(ScoredCandidate { book: book.clone(), score: EXCLUDED_SCORE }.is_excluded());
        assert!(ScoredCandidate { book: book.clone(), score: FICTION_FLOOR_SCORE }.is_excluded());
        assert!(!ScoredCandidate { book, score: -10 }.is_excluded());
    }
}
