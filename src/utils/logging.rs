//! Tracing subscriber setup for embedders and binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global tracing subscriber. `RUST_LOG` wins when set; otherwise
/// the crate logs at `level`. Returns quietly if a subscriber is already
/// installed, so tests can call this freely.
pub fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("book_scout={}", level)),
    );
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
