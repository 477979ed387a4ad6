//! Prompt builder for the formatting request.
//!
//! [`PromptBuilder::build`] is pure: the same text and options always yield
//! the same prompt, so requests can be replayed against a stub generator.
//! Callers must not pass empty or whitespace-only text; the orchestrator
//! rejects those before a prompt is ever built.

use super::options::FormattingOptions;

// ---------------------------------------------------------------------------
// Template pieces
// ---------------------------------------------------------------------------

const ROLE_INSTRUCTION: &str = "\
You are an expert professional editor and document formatter.
Your task is to take the provided raw text and rewrite/format it to be highly professional and visually structured using Markdown.
";

/// Grammar directive when `fix_grammar` is on.
pub const GRAMMAR_FIX_DIRECTIVE: &str = "Yes, ensure perfect grammar and punctuation.";

/// Grammar directive when `fix_grammar` is off.
pub const GRAMMAR_PRESERVE_DIRECTIVE: &str = "No, preserve original phrasing as much as possible.";

/// Present only when `include_summary` is on.
pub const SUMMARY_DIRECTIVE: &str = "Yes, add a brief executive summary at the top.";

const FORMAT_RULES: &str = "
Instructions:
1. Use Markdown headers (#, ##, ###) to organize sections logically.
2. Use bullet points or numbered lists to break up dense paragraphs.
3. Use bolding (**text**) for key terms or emphasis, but do not overuse it.
4. Ensure the output is ready to be copied into a professional document or email.
5. Do NOT include any conversational filler before or after the content (e.g., \"Here is your formatted text\"). Just provide the formatted content.
";

const RAW_TEXT_LABEL: &str = "\nRaw Text:\n";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds the single instruction string sent to the generation service.
///
/// # Example
/// ```rust
/// use proformat::format::{FormattingOptions, PromptBuilder, Tone};
///
/// let opts = FormattingOptions::default().with_tone(Tone::Casual);
/// let prompt = PromptBuilder::build("hello team", &opts);
/// assert!(prompt.contains("Tone: Casual"));
/// assert!(prompt.ends_with("hello team"));
/// ```
pub struct PromptBuilder;

impl PromptBuilder {
    /// Structure (in order):
    /// 1. Role instruction
    /// 2. Configuration block (tone, grammar, optional summary)
    /// 3. Formatting rules, including the no-filler rule
    /// 4. The raw text, verbatim, as the final section
    pub fn build(raw: &str, options: &FormattingOptions) -> String {
        let mut prompt = String::with_capacity(1024 + raw.len());
        prompt.push_str(ROLE_INSTRUCTION);

        prompt.push_str("\nConfiguration:\n");
        prompt.push_str(&format!("- Tone: {}\n", options.tone.name()));
        prompt.push_str(&format!(
            "- Fix Grammar: {}\n",
            if options.fix_grammar {
                GRAMMAR_FIX_DIRECTIVE
            } else {
                GRAMMAR_PRESERVE_DIRECTIVE
            }
        ));
        if options.include_summary {
            prompt.push_str(&format!("- Include Summary: {SUMMARY_DIRECTIVE}\n"));
        }

        prompt.push_str(FORMAT_RULES);
        prompt.push_str(RAW_TEXT_LABEL);
        prompt.push_str(raw);
        prompt
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
