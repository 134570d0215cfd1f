//! Utility modules supporting the search pipeline.
//!
//! - [`cache`]: in-memory TTL cache for ranked result lists
//! - [`logging`]: tracing subscriber setup
//! - [`text`]: text normalization helpers shared by the planner,
//!   deduplicator, and scorer

pub mod cache;
pub mod logging;
pub mod text;

pub use cache::{CacheResult, Clock, ResultCache, SystemClock};
pub use logging::init_logging;
pub use text::{contains_cjk, normalize_title};
