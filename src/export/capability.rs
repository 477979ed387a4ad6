//! Side-effecting capabilities consumed by the exporter.
//!
//! Each capability is a small object-safe trait so the exporter can be driven
//! by the native implementations in [`super::native`] or by in-memory test
//! doubles.

use async_trait::async_trait;

use super::page::PageSetup;
use super::render::ExportArtifact;
use super::{ClipboardError, ExportError};

/// Saves an artifact under its file name.
pub trait Downloader: Send + Sync {
    fn save(&self, artifact: &ExportArtifact) -> Result<(), ExportError>;
}

/// Writes plain text to the clipboard.
pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Sends the printable region (a standalone HTML document) to the printer.
pub trait Printer: Send + Sync {
    fn print(&self, document: &str) -> Result<(), ExportError>;
}

/// HTML → paginated document converter.
///
/// May not be available when first used; callers must check
/// [`is_ready`](Paginator::is_ready) before [`paginate`](Paginator::paginate).
#[async_trait]
pub trait Paginator: Send + Sync {
    fn is_ready(&self) -> bool;

    async fn paginate(
        &self,
        document: &str,
        setup: &PageSetup,
        file_name: &str,
    ) -> Result<(), ExportError>;
}
