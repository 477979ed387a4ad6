//! ProFormat: rewrite rough text into a structured document through an
//! external generation service, then export it.
//!
//! * [`config`]   — settings, paths, TOML persistence.
//! * [`format`]   — formatting options and the prompt builder.
//! * [`llm`]      — generation backends behind the [`llm::TextGenerator`] trait.
//! * [`pipeline`] — the request orchestrator and shared state.
//! * [`export`]   — rendering to markdown, text, HTML, Word and PDF.

pub mod config;
pub mod export;
pub mod format;
pub mod llm;
pub mod pipeline;
