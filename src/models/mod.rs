//! Core data structures shared across the search pipeline.

mod book;
mod query;

pub use book::{Book, BookBuilder, SourceType};
pub use query::{
    LangPref, ProviderResult, ScoredCandidate, SearchQuery, EXCLUDED_SCORE, FICTION_FLOOR_SCORE,
};
