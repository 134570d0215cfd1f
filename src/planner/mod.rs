//! Query planner: free text in, a shaped [`SearchQuery`] out.
//!
//! When an intent collaborator is configured its structured output drives
//! planning; otherwise (or whenever it fails) planning degrades to
//! deterministic rule-based extraction. Query shaping differs by genre:
//! fiction queries stay terse (one or two keywords, no generic modifiers),
//! technical queries fan out into canonical-work variants to compensate for
//! providers with weak free-text relevance.

mod intent;

pub use intent::{HttpIntentAnalyzer, Intent, IntentAnalyzer, IntentCategory};

use std::sync::Arc;

use crate::models::{LangPref, SearchQuery};
use crate::scoring::tables::{
    category_for, FICTION_GENRES, FICTION_INTENT_TERMS, GENERIC_MODIFIERS, PRACTICAL_TERMS,
    PROTECTED_COMPOUNDS, STOP_WORDS, THEORETICAL_TERMS,
};
use crate::utils::text::contains_cjk;

const MAX_KEYWORDS: usize = 8;
const MAX_FICTION_KEYWORDS: usize = 2;
const MAX_VARIANTS: usize = 6;

/// Plans queries, using the intent collaborator when one is configured
#[derive(Debug, Clone, Default)]
pub struct QueryPlanner {
    analyzer: Option<Arc<dyn IntentAnalyzer>>,
}

impl QueryPlanner {
    /// Planner without a collaborator; always rule-based
    pub fn rule_based() -> Self {
        Self { analyzer: None }
    }

    /// Planner backed by an intent collaborator
    pub fn with_analyzer(analyzer: Arc<dyn IntentAnalyzer>) -> Self {
        Self {
            analyzer: Some(analyzer),
        }
    }

    /// Plan a query from raw user text
    pub async fn plan(
        &self,
        raw: &str,
        language: Option<LangPref>,
        max_results: usize,
    ) -> SearchQuery {
        let intent = match &self.analyzer {
            Some(analyzer) => analyzer.analyze(raw).await,
            None => None,
        };
        match intent {
            Some(intent) => plan_from_intent(raw, &intent, language, max_results),
            None => {
                tracing::debug!("planning query with rule-based extraction");
                plan_rule_based(raw, language, max_results)
            }
        }
    }
}

/// Build a query from collaborator output, still applying the shaping rules
fn plan_from_intent(
    raw: &str,
    intent: &Intent,
    language: Option<LangPref>,
    max_results: usize,
) -> SearchQuery {
    let is_fiction = intent.category == IntentCategory::Fiction;
    let resolved_language = language.unwrap_or_else(|| match intent.language.as_deref() {
        Some("zh") => LangPref::Zh,
        Some("en") => LangPref::En,
        _ => detect_language_pref(raw),
    });

    let mut keywords: Vec<String> = intent
        .search_keywords
        .iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        keywords = extract_keywords(&intent.topic);
    }
    if keywords.is_empty() {
        keywords = extract_keywords(raw);
    }
    if is_fiction {
        keywords = shape_fiction_keywords(keywords, raw);
    } else {
        keywords.truncate(MAX_KEYWORDS);
    }

    let is_theoretical = match intent.book_type.as_deref() {
        Some("theoretical") => true,
        Some("practical") => false,
        _ => detect_theoretical(raw),
    };

    let variants = build_variants(&intent.topic, &keywords, is_fiction);

    SearchQuery {
        raw: raw.to_string(),
        keywords,
        is_fiction,
        is_theoretical,
        language: resolved_language,
        max_results,
        variants,
    }
}

/// Deterministic fallback when the collaborator is absent or unusable
fn plan_rule_based(raw: &str, language: Option<LangPref>, max_results: usize) -> SearchQuery {
    let resolved_language = language.unwrap_or_else(|| detect_language_pref(raw));
    let is_fiction = detect_fiction(raw);
    let is_theoretical = detect_theoretical(raw);

    let mut keywords = extract_keywords(raw);
    if keywords.is_empty() {
        keywords = vec![raw.trim().to_string()];
    }
    if is_fiction {
        keywords = shape_fiction_keywords(keywords, raw);
    } else {
        keywords.truncate(MAX_KEYWORDS);
    }

    let topic = keywords.first().cloned().unwrap_or_else(|| raw.to_string());
    let variants = build_variants(&topic, &keywords, is_fiction);

    SearchQuery {
        raw: raw.to_string(),
        keywords,
        is_fiction,
        is_theoretical,
        language: resolved_language,
        max_results,
        variants,
    }
}

fn detect_language_pref(raw: &str) -> LangPref {
    if contains_cjk(raw) {
        LangPref::Zh
    } else {
        LangPref::En
    }
}

fn detect_fiction(raw: &str) -> bool {
    let lower = raw.to_lowercase();
    FICTION_INTENT_TERMS.iter().any(|t| lower.contains(t))
        || crate::scoring::tables::FICTION_GENRES
            .iter()
            .any(|g| g.vocabulary.iter().any(|v| lower.contains(v)))
}

fn detect_theoretical(raw: &str) -> bool {
    let lower = raw.to_lowercase();
    if PRACTICAL_TERMS.iter().any(|t| lower.contains(t)) {
        return false;
    }
    THEORETICAL_TERMS.iter().any(|t| lower.contains(t))
}

/// Fiction keyword shaping: the genre/topic term leads, an optional
/// reference author/work follows, and generic modifiers ("popular",
/// "classic", ...) plus bare fiction markers ("novels") are dropped.
fn shape_fiction_keywords(keywords: Vec<String>, raw: &str) -> Vec<String> {
    let mut shaped: Vec<String> = Vec::new();

    for keyword in &keywords {
        let lower = keyword.to_lowercase();
        let is_genre = FICTION_GENRES
            .iter()
            .any(|g| g.vocabulary.iter().any(|v| lower.contains(v)));
        if is_genre && !shaped.contains(keyword) {
            shaped.push(keyword.clone());
        }
    }
    for keyword in keywords {
        if shaped.contains(&keyword) {
            continue;
        }
        let lower = keyword.to_lowercase();
        if GENERIC_MODIFIERS.contains(&lower.as_str())
            || FICTION_INTENT_TERMS.contains(&lower.as_str())
        {
            continue;
        }
        shaped.push(keyword);
    }

    shaped.truncate(MAX_FICTION_KEYWORDS);
    if shaped.is_empty() {
        shaped.push(raw.trim().to_string());
    }
    shaped
}

/// Tokenize and strip stop words, protecting known multi-word compounds
/// from being split apart: compounds are swapped for placeholders before
/// tokenization and restored afterwards.
fn extract_keywords(raw: &str) -> Vec<String> {
    let mut text = raw.to_lowercase();
    let mut protected: Vec<&'static str> = Vec::new();

    for compound in PROTECTED_COMPOUNDS {
        if text.contains(compound) {
            let placeholder = format!("\u{1}{}\u{1}", protected.len());
            text = text.replace(compound, &placeholder);
            protected.push(compound);
        }
    }

    let mut keywords = Vec::new();
    for token in text.split(|c: char| c.is_whitespace() || ",.;!?，。；！？".contains(c)) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        // Restore a protected compound placeholder
        if let Some(rest) = token.strip_prefix('\u{1}') {
            if let Some(index) = rest
                .strip_suffix('\u{1}')
                .and_then(|n| n.parse::<usize>().ok())
            {
                if let Some(compound) = protected.get(index) {
                    keywords.push(compound.to_string());
                    continue;
                }
            }
        }
        if STOP_WORDS.contains(&token) {
            continue;
        }
        // CJK queries arrive unsegmented; strip stop substrings instead
        if contains_cjk(token) {
            let mut cleaned = token.to_string();
            for stop in STOP_WORDS.iter().filter(|s| contains_cjk(s)) {
                cleaned = cleaned.replace(stop, "");
            }
            if !cleaned.is_empty() {
                keywords.push(cleaned);
            }
            continue;
        }
        keywords.push(token.to_string());
    }
    keywords.truncate(MAX_KEYWORDS);
    keywords
}

/// Provider query variants: the topic itself, plus canonical-work queries
/// for recognized technical categories. Fiction sticks to its 1-2 keywords
/// with no appended modifiers.
fn build_variants(topic: &str, keywords: &[String], is_fiction: bool) -> Vec<String> {
    if is_fiction {
        let joined = keywords.join(" ");
        return vec![if joined.is_empty() { topic.to_string() } else { joined }];
    }

    let mut variants = vec![topic.to_string()];
    if let Some(category) = category_for(topic) {
        for canonical in category.canonical_queries {
            if variants.len() >= MAX_VARIANTS {
                break;
            }
            variants.push(canonical.to_string());
        }
    }
    variants
}
