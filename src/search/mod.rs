//! The search pipeline: plan, fan out, dedup, score, rank, cache.

mod dedup;
mod fanout;
mod rank;

pub use dedup::dedup_books;
pub use fanout::{fan_out, plan_quotas, ProviderQuota};
pub use rank::rank;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::SearchConfig;
use crate::models::{Book, LangPref, ProviderResult, SearchQuery};
use crate::planner::{HttpIntentAnalyzer, QueryPlanner};
use crate::providers::ProviderRegistry;
use crate::scoring::score_candidates;
use crate::utils::cache::{CacheResult, ResultCache};

/// Book discovery service: one public operation, [`SearchService::search_books`]
#[derive(Debug)]
pub struct SearchService {
    registry: ProviderRegistry,
    planner: QueryPlanner,
    cache: ResultCache,
    config: SearchConfig,
}

impl SearchService {
    /// Service with the standard provider registry. The intent collaborator
    /// is used only when the config carries an endpoint and key.
    pub fn new(config: SearchConfig) -> Self {
        let planner = match HttpIntentAnalyzer::from_config(&config.intent) {
            Some(analyzer) => QueryPlanner::with_analyzer(Arc::new(analyzer)),
            None => QueryPlanner::rule_based(),
        };
        let cache = ResultCache::new(
            Duration::from_secs(config.cache.ttl_seconds),
            config.cache.max_entries,
        );
        Self {
            registry: ProviderRegistry::new(),
            planner,
            cache,
            config,
        }
    }

    /// Service from explicit parts, for tests and embedders that supply
    /// their own providers
    pub fn with_parts(
        registry: ProviderRegistry,
        planner: QueryPlanner,
        cache: ResultCache,
        config: SearchConfig,
    ) -> Self {
        Self {
            registry,
            planner,
            cache,
            config,
        }
    }

    /// Search for books matching free-form user text.
    ///
    /// Returns at most `max_results` books, best first. Never fails: provider
    /// errors, collaborator outages, and timeouts all degrade to fewer (or
    /// zero) results.
    pub async fn search_books(
        &self,
        raw: &str,
        max_results: usize,
        language: LangPref,
    ) -> Vec<Book> {
        if raw.trim().is_empty() || max_results == 0 {
            return Vec::new();
        }

        // Keyed by language as well as text so a strict-language search never
        // serves a list ranked under a different preference
        let cache_key = format!("{}|{}", language.code().unwrap_or("any"), raw);
        if self.config.cache.enabled {
            if let CacheResult::Hit(mut books) = self.cache.get(&cache_key) {
                books.truncate(max_results);
                return books;
            }
        }

        let started = Instant::now();
        let query = self.planner.plan(raw, Some(language), max_results).await;
        let quotas = plan_quotas(
            &self.registry,
            query.language,
            max_results,
            &self.config.fanout,
        );

        let mut collected = collect_books(fan_out(&quotas, query.primary_variant()).await);
        let mut ranked = self.process(collected.clone(), &query);

        // One retry with the next variant when the first pass came up short
        if ranked.len() * 2 < max_results && query.variants.len() > 1 {
            tracing::info!(
                found = ranked.len(),
                target = max_results,
                variant = %query.variants[1],
                "weak first pass, retrying with next variant"
            );
            collected.extend(collect_books(fan_out(&quotas, &query.variants[1]).await));
            ranked = self.process(collected, &query);
        }

        tracing::info!(
            query = raw,
            results = ranked.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            fiction = query.is_fiction,
            "search complete"
        );

        if self.config.cache.enabled {
            self.cache.put(&cache_key, ranked.clone());
        }
        ranked
    }

    fn process(&self, books: Vec<Book>, query: &SearchQuery) -> Vec<Book> {
        let deduped = dedup_books(books);
        let scored = score_candidates(deduped, query);
        rank(scored, query.is_fiction, query.max_results, &self.config.ranking)
    }
}

fn collect_books(results: Vec<ProviderResult>) -> Vec<Book> {
    results.into_iter().flat_map(|r| r.books).collect()
}
