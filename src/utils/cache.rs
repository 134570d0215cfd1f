//! In-memory TTL cache for ranked search results.
//!
//! Keyed by the normalized (trimmed, lowercased) query string. Entries older
//! than the TTL are treated as absent on read; when the entry count exceeds
//! the capacity bound on write, all expired entries are swept before the
//! insert. There is no strict LRU. A poisoned lock degrades to a miss, never
//! an aborted search.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::models::Book;

/// Time source for the cache, injectable so TTL behavior is testable
/// without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Result of a cache lookup
#[derive(Debug)]
pub enum CacheResult {
    /// Entry was found and is fresh
    Hit(Vec<Book>),
    /// No fresh entry for this key
    Miss,
}

struct CacheEntry {
    books: Vec<Book>,
    inserted_at: Instant,
}

/// Short-TTL memory cache for final ranked book lists
pub struct ResultCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
    clock: Box<dyn Clock>,
}

impl ResultCache {
    /// Create a cache with the given TTL and capacity bound
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self::with_clock(ttl, max_entries, Box::new(SystemClock))
    }

    /// Create a cache with an injected clock (tests)
    pub fn with_clock(ttl: Duration, max_entries: usize, clock: Box<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries,
            clock,
        }
    }

    /// Normalize a raw query into a cache key
    pub fn key_for(query: &str) -> String {
        query.trim().to_lowercase()
    }

    /// Look up a fresh entry for the query
    pub fn get(&self, query: &str) -> CacheResult {
        let key = Self::key_for(query);
        let guard = match self.entries.lock() {
            Ok(g) => g,
            Err(e) => {
                tracing::warn!("result cache lock poisoned, treating as miss: {}", e);
                return CacheResult::Miss;
            }
        };
        match guard.get(&key) {
            Some(entry) if self.is_fresh(entry) => {
                tracing::debug!(key = %key, "cache hit");
                CacheResult::Hit(entry.books.clone())
            }
            Some(_) => {
                tracing::debug!(key = %key, "cache expired");
                CacheResult::Miss
            }
            None => {
                tracing::debug!(key = %key, "cache miss");
                CacheResult::Miss
            }
        }
    }

    /// Store the ranked list for the query, sweeping expired entries first
    /// when the cache is over its bound
    pub fn put(&self, query: &str, books: Vec<Book>) {
        let key = Self::key_for(query);
        let now = self.clock.now();
        let mut guard = match self.entries.lock() {
            Ok(g) => g,
            Err(e) => {
                tracing::warn!("result cache lock poisoned, dropping write: {}", e);
                return;
            }
        };
        if guard.len() >= self.max_entries {
            let ttl = self.ttl;
            guard.retain(|_, entry| now.duration_since(entry.inserted_at) < ttl);
            tracing::debug!(remaining = guard.len(), "swept expired cache entries");
        }
        guard.insert(
            key,
            CacheEntry {
                books,
                inserted_at: now,
            },
        );
    }

    /// Number of entries currently held, fresh or not
    pub fn len(&self) -> usize {
        self.entries.lock().map(|g| g.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        self.clock.now().duration_since(entry.inserted_at) < self.ttl
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .field("len", &self.len())
            .finish()
    }
}
