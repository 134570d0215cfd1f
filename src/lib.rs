//! # Book Scout
//!
//! Multi-provider book discovery: one query fans out to heterogeneous book
//! catalogs (Google Books, Open Library, Douban), and the results are
//! deduplicated, scored for relevance, and ranked into a single bounded
//! list.
//!
//! ## Quick start
//!
//! ```no_run
//! use book_scout::{LangPref, SearchConfig, SearchService};
//!
//! # async fn example() {
//! let service = SearchService::new(SearchConfig::default());
//! let books = service
//!     .search_books("I want to learn machine learning", 10, LangPref::Any)
//!     .await;
//! for book in books {
//!     println!("{} by {}", book.title, book.authors.join(", "));
//! }
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`planner`] turns free text into a shaped query, via an optional
//!   LLM-backed intent collaborator with a deterministic rule-based fallback
//! - [`providers`] adapts each catalog API to one canonical [`Book`] shape
//! - [`search`] fans out concurrently, deduplicates, ranks, and caches
//! - [`scoring`] holds the relevance rules and vocabulary tables

pub mod config;
pub mod models;
pub mod planner;
pub mod providers;
pub mod scoring;
pub mod search;
pub mod utils;

pub use config::{load_config, SearchConfig};
pub use models::{Book, LangPref, SourceType};
pub use providers::{Provider, ProviderRegistry};
pub use search::SearchService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
