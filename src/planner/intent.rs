//! Intent collaborator client.
//!
//! The collaborator is an LLM-backed service that turns free-form user text
//! into a structured intent. Its output is duck-typed JSON, so parsing is
//! strict against an explicit schema and every failure path (transport,
//! malformed JSON, schema mismatch) collapses to `None`, which callers must
//! treat as "fall back to rule-based extraction".

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::IntentConfig;

/// Query category as classified by the collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentCategory {
    Technical,
    Fiction,
    #[serde(other)]
    Other,
}

/// Structured intent parsed from the collaborator's response
#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
    pub topic: String,
    pub category: IntentCategory,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub book_type: Option<String>,
    #[serde(default)]
    pub search_keywords: Vec<String>,
}

/// Interface to the intent collaborator. `None` means unavailable or
/// unusable output; never an error.
#[async_trait]
pub trait IntentAnalyzer: Send + Sync + std::fmt::Debug {
    async fn analyze(&self, text: &str) -> Option<Intent>;
}

/// HTTP client for an OpenAI-style chat-completions intent endpoint
#[derive(Debug)]
pub struct HttpIntentAnalyzer {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HttpIntentAnalyzer {
    /// Build the analyzer from config; returns `None` when no endpoint or
    /// key is configured, in which case planning is rule-based
    pub fn from_config(config: &IntentConfig) -> Option<Self> {
        let base_url = config.base_url.clone()?;
        let api_key = config.api_key.clone()?;
        Some(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            base_url,
            api_key,
            model: config.model.clone(),
        })
    }

    /// Pull the first balanced JSON object out of a chat reply. Models wrap
    /// their JSON in prose or code fences more often than not.
    fn extract_json_object(text: &str) -> Option<&str> {
        let start = text.find('{')?;
        let mut depth = 0usize;
        for (i, c) in text[start..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&text[start..start + i + 1]);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn parse_reply(reply: &str) -> Option<Intent> {
        let object = Self::extract_json_object(reply)?;
        let intent: Intent = serde_json::from_str(object).ok()?;
        if intent.topic.trim().is_empty() {
            return None;
        }
        Some(intent)
    }
}

#[async_trait]
impl IntentAnalyzer for HttpIntentAnalyzer {
    async fn analyze(&self, text: &str) -> Option<Intent> {
        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "Classify the user's book request. Reply with only a JSON object \
                                with fields: topic (string), category (technical|fiction|other), \
                                level (string, optional), language (zh|en, optional), \
                                book_type (theoretical|practical, optional), \
                                search_keywords (array of strings)."
                },
                { "role": "user", "content": text }
            ],
            "temperature": 0
        });

        let response = match self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "intent collaborator unreachable, falling back");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "intent collaborator error, falling back");
            return None;
        }

        let payload: ChatResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "intent response not valid JSON, falling back");
                return None;
            }
        };

        let reply = payload
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default();

        match Self::parse_reply(reply) {
            Some(intent) => Some(intent),
            None => {
                tracing::warn!("intent reply did not match the expected schema, falling back");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}
