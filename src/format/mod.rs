//! Request-side building blocks: the formatting options snapshot and the
//! pure prompt builder.
//!
//! * [`FormattingOptions`] / [`Tone`] — immutable per-request configuration.
//! * [`PromptBuilder`] — `(raw text, options) → prompt string`, deterministic.

pub mod options;
pub mod prompt;

pub use options::{FormattingOptions, Tone, UnknownTone};
pub use prompt::PromptBuilder;
