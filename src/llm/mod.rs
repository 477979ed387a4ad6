//! Generation client adapter for ProFormat.
//!
//! This module provides:
//! * [`TextGenerator`] — async trait implemented by all generation backends.
//! * [`GeminiGenerator`] — Gemini `generateContent` REST backend (default).
//! * [`OpenAiGenerator`] — OpenAI-compatible chat-completions backend.
//! * [`GuardedGenerator`] — wraps any backend; replaces empty successes with
//!   a sentinel text.
//! * [`GenerationFailure`] — the single error every backend failure maps to.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use proformat::config::AppConfig;
//! use proformat::format::{FormattingOptions, PromptBuilder};
//! use proformat::llm::generator_from_config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let generator = generator_from_config(&config.generation);
//!
//!     let prompt = PromptBuilder::build("q3 budget notes", &FormattingOptions::default());
//!     match generator.generate(&prompt).await {
//!         Ok(markdown) => println!("{markdown}"),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! ```

pub mod generator;
pub mod guard;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use generator::{
    generator_from_config, GeminiGenerator, GenerationFailure, OpenAiGenerator, TextGenerator,
};
pub use guard::{GuardedGenerator, EMPTY_OUTPUT_SENTINEL};
