//! Formatting options: the per-request configuration snapshot.
//!
//! [`FormattingOptions`] is `Copy`, so every request captures its own value;
//! later edits to the live options never reach a request that is already in
//! flight.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tone
// ---------------------------------------------------------------------------

/// Style the external rewrite is steered towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Professional,
    Academic,
    Casual,
    #[serde(rename = "Executive Summary", alias = "ExecutiveSummary")]
    ExecutiveSummary,
    Persuasive,
}

impl Tone {
    /// Every tone, in display order.
    pub const ALL: [Tone; 5] = [
        Tone::Professional,
        Tone::Academic,
        Tone::Casual,
        Tone::ExecutiveSummary,
        Tone::Persuasive,
    ];

    /// Name embedded verbatim in the prompt.
    pub fn name(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Academic => "Academic",
            Tone::Casual => "Casual",
            Tone::ExecutiveSummary => "Executive Summary",
            Tone::Persuasive => "Persuasive",
        }
    }
}

impl Default for Tone {
    fn default() -> Self {
        Tone::Professional
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown tone name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tone `{0}` (expected one of: professional, academic, casual, executive-summary, persuasive)")]
pub struct UnknownTone(pub String);

impl FromStr for Tone {
    type Err = UnknownTone;

    /// Case-insensitive; spaces, dashes and underscores are interchangeable,
    /// so `"Executive Summary"`, `"executive-summary"` and
    /// `"executive_summary"` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalised.as_str() {
            "professional" => Ok(Tone::Professional),
            "academic" => Ok(Tone::Academic),
            "casual" => Ok(Tone::Casual),
            "executivesummary" | "executive" => Ok(Tone::ExecutiveSummary),
            "persuasive" => Ok(Tone::Persuasive),
            _ => Err(UnknownTone(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// FormattingOptions
// ---------------------------------------------------------------------------

/// Tone plus the two boolean toggles sent with every request.
///
/// ```
/// use proformat::format::{FormattingOptions, Tone};
///
/// let opts = FormattingOptions::default()
///     .with_tone(Tone::Academic)
///     .with_include_summary(true);
/// assert_eq!(opts.tone, Tone::Academic);
/// assert!(opts.fix_grammar);
/// assert!(opts.include_summary);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingOptions {
    pub tone: Tone,
    /// Normalise grammar and punctuation instead of preserving phrasing.
    pub fix_grammar: bool,
    /// Prepend a short executive summary section.
    pub include_summary: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            tone: Tone::Professional,
            fix_grammar: true,
            include_summary: false,
        }
    }
}

impl FormattingOptions {
    pub fn with_tone(self, tone: Tone) -> Self {
        Self { tone, ..self }
    }

    pub fn with_fix_grammar(self, fix_grammar: bool) -> Self {
        Self {
            fix_grammar,
            ..self
        }
    }

    pub fn with_include_summary(self, include_summary: bool) -> Self {
        Self {
            include_summary,
            ..self
        }
    }
}
