//! Export renderer for ProFormat.
//!
//! # Overview
//!
//! Formatted markdown is turned into one of several [`ExportFormat`]s:
//!
//! 1. **Render** — pure: [`render`] produces an [`ExportArtifact`]
//!    (markdown/plain text passthrough, standalone light HTML, Word-flavoured
//!    HTML, or the HTML fed to the paginator).
//! 2. **Hand off** — [`Exporter`] passes the artifact to a capability from
//!    its [`ExportHost`]: a [`Downloader`], [`ClipboardWriter`], [`Printer`]
//!    or [`Paginator`].
//!
//! # Usage
//!
//! ```no_run
//! use proformat::config::ExportConfig;
//! use proformat::export::{ExportFormat, Exporter};
//!
//! # async fn example() {
//! let exporter = Exporter::from_config(&ExportConfig::default());
//! let file = exporter.export("# Notes", ExportFormat::WordHypertext).await.unwrap();
//! println!("saved {file}");
//! # }
//! ```

pub mod capability;
pub mod exporter;
pub mod format;
pub mod markdown;
pub mod native;
pub mod page;
pub mod render;
pub mod style;

pub use capability::{ClipboardWriter, Downloader, Paginator, Printer};
pub use exporter::{ExportHost, Exporter};
pub use format::{ExportFormat, UnknownFormat};
pub use markdown::markdown_to_html;
pub use native::{CommandPaginator, CommandPrinter, FsDownloader, SystemClipboard};
pub use page::{Orientation, PageFormat, PageSetup};
pub use render::{render, render_preview, ExportArtifact, FilenameStamper, UTF8_BOM};
pub use style::{Palette, Theme, UnknownTheme};

use thiserror::Error;

// ---------------------------------------------------------------------------
// ExportError
// ---------------------------------------------------------------------------

/// Transient, non-fatal export failures.  None of them affect the stored
/// result.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The PDF renderer is not available yet.
    #[error("PDF generator is initializing. Please try again in a moment.")]
    PaginatorNotReady,

    /// There is no formatted text to export.
    #[error("nothing to export yet")]
    NothingToExport,

    /// Saving the file failed.
    #[error("download failed: {0}")]
    Download(String),

    /// The print command failed.
    #[error("print failed: {0}")]
    Print(String),

    /// The PDF renderer failed.
    #[error("PDF generation failed: {0}")]
    Pagination(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The clipboard could not be written.
#[derive(Debug, Clone, Error)]
#[error("cannot write to clipboard: {0}")]
pub struct ClipboardError(pub String);
