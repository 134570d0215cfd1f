//! Configuration loading and defaults.
//!
//! Every section has serde defaults, so an empty file or no file at all
//! yields a fully working configuration. Environment variables prefixed
//! `BOOK_SCOUT_` override file values.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the search service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchConfig {
    #[serde(default)]
    pub fanout: FanoutConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub intent: IntentConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
}

/// Fan-out quota tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanoutConfig {
    /// Per-provider fetch limits are this many times the final target, so
    /// filtering and dedup have headroom
    #[serde(default = "default_overfetch_multiplier")]
    pub overfetch_multiplier: usize,
    /// Share of the target assigned to the Latin-script family when no
    /// strict language preference is given
    #[serde(default = "default_latin_share")]
    pub latin_share: f32,
    /// Share assigned to the CJK family under the same conditions
    #[serde(default = "default_cjk_share")]
    pub cjk_share: f32,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            overfetch_multiplier: default_overfetch_multiplier(),
            latin_share: default_latin_share(),
            cjk_share: default_cjk_share(),
        }
    }
}

/// Result cache tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl_seconds")]
    pub ttl_seconds: u64,
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_seconds: default_cache_ttl_seconds(),
            max_entries: default_cache_max_entries(),
        }
    }
}

/// Intent collaborator endpoint. Both `base_url` and `api_key` must be set
/// for the collaborator to be used; otherwise planning is rule-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_intent_model")]
    pub model: String,
    #[serde(default = "default_intent_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            model: default_intent_model(),
            timeout_secs: default_intent_timeout_secs(),
        }
    }
}

/// Score thresholds for final selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Minimum score for first-tier inclusion on technical/general queries
    #[serde(default = "default_nonfiction_threshold")]
    pub nonfiction_threshold: i32,
    /// Minimum score for first-tier inclusion on fiction queries
    #[serde(default = "default_fiction_threshold")]
    pub fiction_threshold: i32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            nonfiction_threshold: default_nonfiction_threshold(),
            fiction_threshold: default_fiction_threshold(),
        }
    }
}

fn default_overfetch_multiplier() -> usize {
    3
}

fn default_latin_share() -> f32 {
    0.6
}

fn default_cjk_share() -> f32 {
    0.4
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl_seconds() -> u64 {
    300
}

fn default_cache_max_entries() -> usize {
    100
}

fn default_intent_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_intent_timeout_secs() -> u64 {
    6
}

fn default_nonfiction_threshold() -> i32 {
    20
}

fn default_fiction_threshold() -> i32 {
    10
}

/// Load configuration from an optional TOML file plus `BOOK_SCOUT_*`
/// environment overrides
pub fn load_config(path: Option<&str>) -> Result<SearchConfig, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::with_name(path));
    }
    builder = builder.add_source(config::Environment::with_prefix("BOOK_SCOUT"));
    builder.build()?.try_deserialize()
}
