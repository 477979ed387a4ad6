//! Pure rendering of formatted text into export artifacts.
//!
//! Nothing here touches the filesystem or orchestrator state; artifacts are
//! regenerated on every export action.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use super::format::ExportFormat;
use super::markdown::markdown_to_html;
use super::style::{stylesheet, Palette, Theme};

/// UTF-8 byte-order marker prefixed to hypertext payloads.
pub const UTF8_BOM: &str = "\u{feff}";

const DOCUMENT_TITLE: &str = "Formatted Document";

const WORD_ROOT: &str = "<html xmlns:o='urn:schemas-microsoft-com:office:office' \
xmlns:w='urn:schemas-microsoft-com:office:word' \
xmlns='http://www.w3.org/TR/REC-html40'>";

const HTML_ROOT: &str = "<!DOCTYPE html>\n<html>";

// ---------------------------------------------------------------------------
// ExportArtifact
// ---------------------------------------------------------------------------

/// One format-specific rendering, ready for hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub file_name: String,
    pub payload: Vec<u8>,
}

impl ExportArtifact {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Payload as text, when it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render `text` as `format`.
///
/// * markdown / plain text — byte-identical passthrough.
/// * hypertext / word-hypertext — BOM + standalone document using the
///   print palette, whatever `ambient` is.
/// * paginated document — the standalone light document (no BOM) that the
///   paginator consumes; `file_name` carries the `.pdf` name to produce.
pub fn render(text: &str, format: ExportFormat, ambient: Theme, file_stem: &str) -> ExportArtifact {
    let palette = Palette::for_export(ambient);
    let payload = match format {
        ExportFormat::MarkdownSource | ExportFormat::PlainText => text.to_string(),
        ExportFormat::Hypertext => {
            let mut doc = String::from(UTF8_BOM);
            doc.push_str(&standalone_document(text, &palette, HTML_ROOT));
            doc
        }
        ExportFormat::WordHypertext => {
            let mut doc = String::from(UTF8_BOM);
            doc.push_str(&standalone_document(text, &palette, WORD_ROOT));
            doc
        }
        ExportFormat::PaginatedDocument => standalone_document(text, &palette, HTML_ROOT),
    };

    ExportArtifact {
        format,
        file_name: format!("{file_stem}.{}", format.extension()),
        payload: payload.into_bytes(),
    }
}

/// Standalone preview document in the ambient theme.
pub fn render_preview(text: &str, theme: Theme) -> String {
    standalone_document(text, &Palette::for_preview(theme), HTML_ROOT)
}

fn standalone_document(text: &str, palette: &Palette, root: &str) -> String {
    let body = markdown_to_html(text);
    format!(
        "{root}\n<head>\n<meta charset=\"utf-8\">\n<title>{DOCUMENT_TITLE}</title>\n\
<style>\n{css}</style>\n</head>\n<body>\n<div class=\"content\">\n{body}</div>\n</body>\n</html>\n",
        css = stylesheet(palette),
    )
}

// ---------------------------------------------------------------------------
// FilenameStamper
// ---------------------------------------------------------------------------

/// Produces `{prefix}-{unix_millis}` file stems that never repeat within a
/// process, even for two exports in the same millisecond.
#[derive(Debug)]
pub struct FilenameStamper {
    prefix: String,
    last: AtomicU64,
}

impl FilenameStamper {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            last: AtomicU64::new(0),
        }
    }

    pub fn next_stem(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        let mut prev = self.last.load(Ordering::Relaxed);
        let stamp = loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange(prev, candidate, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => break candidate,
                Err(actual) => prev = actual,
            }
        };
        format!("{}-{stamp}", self.prefix)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
