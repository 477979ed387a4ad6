//! Export formats and their file metadata.

use std::fmt;
use std::str::FromStr;

/// Every rendering the exporter can produce from formatted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// The formatted markdown, unchanged.
    MarkdownSource,
    /// The formatted markdown, unchanged (markup is not stripped).
    PlainText,
    /// Standalone HTML document with a forced light stylesheet.
    Hypertext,
    /// HTML wrapped with Office namespaces so word processors open it as a
    /// native document.
    WordHypertext,
    /// PDF produced by the paginator.
    PaginatedDocument,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::MarkdownSource,
        ExportFormat::PlainText,
        ExportFormat::Hypertext,
        ExportFormat::WordHypertext,
        ExportFormat::PaginatedDocument,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::MarkdownSource => "md",
            ExportFormat::PlainText => "txt",
            ExportFormat::Hypertext => "html",
            ExportFormat::WordHypertext => "doc",
            ExportFormat::PaginatedDocument => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::MarkdownSource => "text/markdown",
            ExportFormat::PlainText => "text/plain",
            ExportFormat::Hypertext => "text/html",
            ExportFormat::WordHypertext => "application/msword",
            ExportFormat::PaginatedDocument => "application/pdf",
        }
    }

    /// Label shown in menus and logs.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::MarkdownSource => "Markdown",
            ExportFormat::PlainText => "Plain Text",
            ExportFormat::Hypertext => "HTML",
            ExportFormat::WordHypertext => "Word Document",
            ExportFormat::PaginatedDocument => "PDF",
        }
    }

    /// Formats whose payload is handed to the paginator rather than saved.
    pub fn is_paginated(&self) -> bool {
        matches!(self, ExportFormat::PaginatedDocument)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown export format `{0}` (expected one of: md, txt, html, doc, pdf)")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(ExportFormat::MarkdownSource),
            "txt" | "text" | "plain" => Ok(ExportFormat::PlainText),
            "html" | "htm" => Ok(ExportFormat::Hypertext),
            "doc" | "word" => Ok(ExportFormat::WordHypertext),
            "pdf" => Ok(ExportFormat::PaginatedDocument),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}
