//! Concurrent provider fan-out.
//!
//! Every provider call runs concurrently with its own timeout; the
//! orchestrator waits for all of them to settle before merging. One
//! provider's failure or timeout never cancels or delays the others, while
//! dropping the fan-out future cancels every in-flight call at once.

use std::sync::Arc;

use futures_util::future::join_all;

use crate::config::FanoutConfig;
use crate::models::{LangPref, ProviderResult};
use crate::providers::{LanguageFamily, Provider, ProviderRegistry};

/// One provider's share of a fan-out pass
#[derive(Debug, Clone)]
pub struct ProviderQuota {
    pub provider: Arc<dyn Provider>,
    /// Result count requested from the provider, over-fetch already applied
    pub fetch_limit: usize,
}

/// Compute per-provider quotas from the language preference. A strict
/// preference skips the other script family entirely; "any" blends the
/// configured shares across both. Each quota is inflated by the over-fetch
/// multiplier to leave headroom for filtering.
pub fn plan_quotas(
    registry: &ProviderRegistry,
    language: LangPref,
    target: usize,
    config: &FanoutConfig,
) -> Vec<ProviderQuota> {
    let family_shares: Vec<(LanguageFamily, f32)> = match language {
        LangPref::En => vec![(LanguageFamily::Latin, 1.0)],
        LangPref::Zh => vec![(LanguageFamily::Cjk, 1.0)],
        LangPref::Any => vec![
            (LanguageFamily::Latin, config.latin_share),
            (LanguageFamily::Cjk, config.cjk_share),
        ],
    };

    let mut quotas = Vec::new();
    for (family, share) in family_shares {
        let providers = registry.with_family(family);
        if providers.is_empty() {
            continue;
        }
        let per_provider = share / providers.len() as f32;
        for provider in providers {
            let ratio_count = ((target as f32 * per_provider).ceil() as usize).max(1);
            quotas.push(ProviderQuota {
                provider: Arc::clone(provider),
                fetch_limit: ratio_count * config.overfetch_multiplier,
            });
        }
    }
    quotas
}

/// Run one fan-out pass for the given query text. Waits for every call to
/// settle; a timed-out provider contributes an empty failed result.
///
/// The calls are not detached tasks: they are polled by this future, so
/// cancelling the enclosing search drops every in-flight provider call
/// immediately instead of leaving fetches running in the background.
pub async fn fan_out(quotas: &[ProviderQuota], query_text: &str) -> Vec<ProviderResult> {
    let calls = quotas.iter().map(|quota| {
        let provider = Arc::clone(&quota.provider);
        let text = query_text.to_string();
        let limit = quota.fetch_limit;
        async move {
            let budget = provider.call_timeout();
            let result = match tokio::time::timeout(budget, provider.search(&text, limit)).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        provider = provider.id(),
                        budget_ms = budget.as_millis() as u64,
                        "provider exceeded its time budget"
                    );
                    ProviderResult::failed(
                        provider.source(),
                        format!("timed out after {}ms", budget.as_millis()),
                        budget.as_millis() as u64,
                    )
                }
            };
            tracing::info!(
                provider = provider.id(),
                count = result.books.len(),
                elapsed_ms = result.elapsed_ms,
                failed = result.error.is_some(),
                "provider settled"
            );
            result
        }
    });

    join_all(calls).await
}
