//! The exporter: renders formatted text and hands it to a capability.
//!
//! [`Exporter`] only ever reads formatted text.  A failed export leaves the
//! orchestrator's result untouched and can be retried without generating
//! again.

use std::sync::Arc;

use crate::config::ExportConfig;
use crate::pipeline::FormatOrchestrator;

use super::capability::{ClipboardWriter, Downloader, Paginator, Printer};
use super::format::ExportFormat;
use super::native::{CommandPaginator, CommandPrinter, FsDownloader, SystemClipboard};
use super::page::PageSetup;
use super::render::{render, FilenameStamper};
use super::style::Theme;
use super::ExportError;

// ---------------------------------------------------------------------------
// ExportHost
// ---------------------------------------------------------------------------

/// The set of capabilities the exporter delegates side effects to.
#[derive(Clone)]
pub struct ExportHost {
    pub downloader: Arc<dyn Downloader>,
    pub clipboard: Arc<dyn ClipboardWriter>,
    pub printer: Arc<dyn Printer>,
    pub paginator: Arc<dyn Paginator>,
}

impl ExportHost {
    /// Filesystem, system clipboard and external commands, as configured.
    pub fn native(config: &ExportConfig) -> Self {
        let dir = config.resolved_output_dir();
        Self {
            downloader: Arc::new(FsDownloader::new(dir.clone())),
            clipboard: Arc::new(SystemClipboard),
            printer: Arc::new(CommandPrinter::new(config.print_command.clone())),
            paginator: Arc::new(CommandPaginator::new(config.pdf_command.clone(), dir)),
        }
    }
}

// ---------------------------------------------------------------------------
// Exporter
// ---------------------------------------------------------------------------

pub struct Exporter {
    host: ExportHost,
    stamper: FilenameStamper,
    page: PageSetup,
    ambient_theme: Theme,
}

impl Exporter {
    pub fn new(host: ExportHost, filename_prefix: impl Into<String>, page: PageSetup) -> Self {
        Self {
            host,
            stamper: FilenameStamper::new(filename_prefix),
            page,
            ambient_theme: Theme::default(),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(
            ExportHost::native(config),
            config.filename_prefix.clone(),
            config.page,
        )
    }

    /// Record the ambient UI theme.  Exports override it with the print
    /// palette.
    pub fn with_ambient_theme(mut self, theme: Theme) -> Self {
        self.ambient_theme = theme;
        self
    }

    /// Render `text` as `format` under a fresh file name and hand it off.
    ///
    /// Returns the file name written.  For PDF, fails with
    /// [`ExportError::PaginatorNotReady`] when the paginator is unavailable.
    pub async fn export(&self, text: &str, format: ExportFormat) -> Result<String, ExportError> {
        if format.is_paginated() && !self.host.paginator.is_ready() {
            log::warn!("export: paginator not ready");
            return Err(ExportError::PaginatorNotReady);
        }

        let artifact = render(text, format, self.ambient_theme, &self.stamper.next_stem());

        if format.is_paginated() {
            let document = artifact
                .as_text()
                .ok_or_else(|| ExportError::Pagination("document is not UTF-8".into()))?;
            self.host
                .paginator
                .paginate(document, &self.page, &artifact.file_name)
                .await?;
        } else {
            self.host.downloader.save(&artifact)?;
        }

        Ok(artifact.file_name)
    }

    /// Export the orchestrator's current result.
    pub async fn export_current(
        &self,
        orchestrator: &FormatOrchestrator,
        format: ExportFormat,
    ) -> Result<String, ExportError> {
        let text = orchestrator.formatted().ok_or(ExportError::NothingToExport)?;
        self.export(&text, format).await
    }

    /// Copy `text` to the clipboard.  Returns whether the copy succeeded;
    /// failures are only logged.
    pub fn copy(&self, text: &str) -> bool {
        match self.host.clipboard.write_text(text) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("export: {e}");
                false
            }
        }
    }

    /// Print `text` as a light, print-friendly document.
    pub fn print(&self, text: &str) -> Result<(), ExportError> {
        let artifact = render(
            text,
            ExportFormat::PaginatedDocument,
            self.ambient_theme,
            "print",
        );
        let document = artifact
            .as_text()
            .ok_or_else(|| ExportError::Print("document is not UTF-8".into()))?;
        self.host.printer.print(document)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
