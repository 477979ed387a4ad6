//! Empty-output guard. Wraps any [`TextGenerator`] and refuses to pass a
//! blank "success" downstream.
//!
//! When the wrapped backend reports success with an empty or whitespace-only
//! payload, [`GuardedGenerator`] substitutes [`EMPTY_OUTPUT_SENTINEL`] so the
//! preview and exports are never blank while the request looks successful.
//! Failures pass through untouched.

use async_trait::async_trait;

use crate::llm::generator::{GenerationFailure, TextGenerator};

/// Text returned in place of an empty successful response.
pub const EMPTY_OUTPUT_SENTINEL: &str = "Failed to generate formatted text.";

/// Transparent wrapper that only rewrites empty successes.
pub struct GuardedGenerator<G: TextGenerator> {
    inner: G,
}

impl<G: TextGenerator> GuardedGenerator<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    /// Return a reference to the wrapped generator.
    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: TextGenerator> TextGenerator for GuardedGenerator<G> {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationFailure> {
        let text = self.inner.generate(prompt).await?;
        if text.trim().is_empty() {
            log::warn!("generation succeeded with an empty payload; substituting sentinel");
            return Ok(EMPTY_OUTPUT_SENTINEL.to_string());
        }
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
