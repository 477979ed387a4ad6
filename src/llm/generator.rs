//! Core `TextGenerator` trait, the classified `GenerationFailure`, and the
//! HTTP backends.
//!
//! Both backends make exactly one request per call and never retry; retrying
//! is a user action handled by the orchestrator.  All connection details come
//! from [`GenerationConfig`]; nothing is hardcoded.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::{GenerationConfig, GenerationProvider};
use crate::llm::guard::GuardedGenerator;

// ---------------------------------------------------------------------------
// GenerationFailure
// ---------------------------------------------------------------------------

/// The single failure classification of the generation adapter.
///
/// Transport, authentication, quota, timeout and malformed-response problems
/// all collapse into this one type.  `detail` is kept for logging only; the
/// `Display` output is the same for every cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to connect to the formatting service")]
pub struct GenerationFailure {
    detail: String,
}

impl GenerationFailure {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    /// Underlying cause, for logs.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<reqwest::Error> for GenerationFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GenerationFailure::new("request timed out")
        } else if let Some(status) = e.status() {
            GenerationFailure::new(format!("service returned HTTP {status}"))
        } else {
            GenerationFailure::new(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// TextGenerator trait
// ---------------------------------------------------------------------------

/// The external generation capability: one prompt in, one text out.
///
/// Implementors must be `Send + Sync` so they can be shared behind an
/// `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationFailure>;
}

// ---------------------------------------------------------------------------
// Shared client construction
// ---------------------------------------------------------------------------

fn http_client(config: &GenerationConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

async fn read_json(response: reqwest::Response) -> Result<Value, GenerationFailure> {
    let response = response.error_for_status()?;
    response
        .json()
        .await
        .map_err(|e| GenerationFailure::new(format!("malformed response: {e}")))
}

// ---------------------------------------------------------------------------
// GeminiGenerator
// ---------------------------------------------------------------------------

/// Calls the Gemini `models/{model}:generateContent` endpoint.
pub struct GeminiGenerator {
    client: reqwest::Client,
    config: GenerationConfig,
    api_key: Option<String>,
}

impl GeminiGenerator {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            client: http_client(config),
            config: config.clone(),
            api_key: config.resolved_api_key(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

/// Concatenated text of the first candidate; empty when the response carries
/// no candidate text.
pub(crate) fn gemini_text(json: &Value) -> String {
    json["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationFailure> {
        let body = serde_json::json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ],
            "generationConfig": {
                "temperature": self.config.temperature
            }
        });

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = self.api_key.as_deref() {
            req = req.header("x-goog-api-key", key);
        }

        log::debug!(
            "gemini: sending prompt (len={}) to model {}",
            prompt.len(),
            self.config.model
        );
        let json = read_json(req.send().await?).await?;
        Ok(gemini_text(&json))
    }
}

// ---------------------------------------------------------------------------
// OpenAiGenerator
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint with the prompt
/// as a single user message.
///
/// The `Authorization: Bearer …` header is attached only when an API key is
/// available, so local providers without authentication work unchanged.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    config: GenerationConfig,
    api_key: Option<String>,
}

impl OpenAiGenerator {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            client: http_client(config),
            config: config.clone(),
            api_key: config.resolved_api_key(),
        }
    }
}

pub(crate) fn chat_completion_text(json: &Value) -> String {
    json["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationFailure> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "stream":      false,
            "temperature": self.config.temperature
        });

        let mut req = self.client.post(&url).json(&body);
        if let Some(key) = self.api_key.as_deref() {
            req = req.bearer_auth(key);
        }

        log::debug!(
            "openai: sending prompt (len={}) to model {}",
            prompt.len(),
            self.config.model
        );
        let json = read_json(req.send().await?).await?;
        Ok(chat_completion_text(&json))
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Build the configured backend, wrapped in the empty-output guard.
pub fn generator_from_config(config: &GenerationConfig) -> Arc<dyn TextGenerator> {
    match config.provider {
        GenerationProvider::Gemini => {
            Arc::new(GuardedGenerator::new(GeminiGenerator::from_config(config)))
        }
        GenerationProvider::OpenAiCompatible => {
            Arc::new(GuardedGenerator::new(OpenAiGenerator::from_config(config)))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
