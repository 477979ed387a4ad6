//! Native capability implementations: filesystem downloads, the system
//! clipboard (`arboard`), and external print / PDF commands.

use std::io::Write;
use std::path::{Path, PathBuf};

use arboard::Clipboard;
use async_trait::async_trait;
use tempfile::NamedTempFile;

use super::capability::{ClipboardWriter, Downloader, Paginator, Printer};
use super::page::PageSetup;
use super::render::ExportArtifact;
use super::{ClipboardError, ExportError};

// ---------------------------------------------------------------------------
// FsDownloader
// ---------------------------------------------------------------------------

/// Writes artifacts into a directory.  Existing files are never overwritten.
#[derive(Debug, Clone)]
pub struct FsDownloader {
    dir: PathBuf,
}

impl FsDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Writes `payload` into a freshly created file, removing the file again if
/// the write fails part-way.
fn fill_or_discard(path: &Path, mut file: impl Write, payload: &[u8]) -> Result<(), ExportError> {
    if let Err(e) = file.write_all(payload).and_then(|()| file.flush()) {
        drop(file);
        if let Err(rm) = std::fs::remove_file(path) {
            log::warn!("export: cannot remove partial {}: {rm}", path.display());
        }
        return Err(ExportError::Download(format!("{}: {e}", path.display())));
    }
    Ok(())
}

impl Downloader for FsDownloader {
    fn save(&self, artifact: &ExportArtifact) -> Result<(), ExportError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&artifact.file_name);

        let file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| ExportError::Download(format!("{}: {e}", path.display())))?;
        fill_or_discard(&path, file, &artifact.payload)?;

        log::info!(
            "export: saved {} ({}, {} bytes)",
            path.display(),
            artifact.mime_type(),
            artifact.payload.len()
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SystemClipboard
// ---------------------------------------------------------------------------

/// The OS clipboard.
///
/// A short-lived [`arboard::Clipboard`] handle is opened per call, because
/// `arboard::Clipboard` is not `Send` on every platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Scratch HTML files
// ---------------------------------------------------------------------------

fn scratch_html(document: &str) -> Result<NamedTempFile, ExportError> {
    let mut file = tempfile::Builder::new()
        .prefix("proformat-")
        .suffix(".html")
        .tempfile()?;
    file.write_all(document.as_bytes())?;
    file.flush()?;
    Ok(file)
}

// ---------------------------------------------------------------------------
// CommandPrinter
// ---------------------------------------------------------------------------

/// Prints by running `program <scratch.html>` (e.g. `lp`).  Page setup is
/// left to the program and the operating environment.
#[derive(Debug, Clone)]
pub struct CommandPrinter {
    program: String,
}

impl CommandPrinter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Printer for CommandPrinter {
    fn print(&self, document: &str) -> Result<(), ExportError> {
        let scratch = scratch_html(document)?;
        let status = std::process::Command::new(&self.program)
            .arg(scratch.path())
            .status()
            .map_err(|e| ExportError::Print(format!("cannot run `{}`: {e}", self.program)))?;

        if !status.success() {
            return Err(ExportError::Print(format!(
                "`{}` exited with {status}",
                self.program
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CommandPaginator
// ---------------------------------------------------------------------------

/// Converts HTML to PDF with a wkhtmltopdf-compatible program, writing into
/// the output directory.
///
/// Ready only once the program can be resolved on `PATH`.
#[derive(Debug, Clone)]
pub struct CommandPaginator {
    program: String,
    output_dir: PathBuf,
}

impl CommandPaginator {
    pub fn new(program: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Command-line flags for `setup`, followed by the input and output paths.
    pub fn arguments(setup: &PageSetup, input: &Path, output: &Path) -> Vec<String> {
        let [top, right, bottom, left] = setup.margins_in;
        let mut args = vec![
            "--quiet".to_string(),
            "--enable-local-file-access".to_string(),
            "--page-size".to_string(),
            setup.format.name().to_string(),
            "--orientation".to_string(),
            setup.orientation.name().to_string(),
            "--margin-top".to_string(),
            format!("{top}in"),
            "--margin-right".to_string(),
            format!("{right}in"),
            "--margin-bottom".to_string(),
            format!("{bottom}in"),
            "--margin-left".to_string(),
            format!("{left}in"),
            "--image-dpi".to_string(),
            setup.image_dpi().to_string(),
            "--image-quality".to_string(),
            setup.image_quality_percent().to_string(),
        ];
        args.push(input.display().to_string());
        args.push(output.display().to_string());
        args
    }
}

#[async_trait]
impl Paginator for CommandPaginator {
    fn is_ready(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    async fn paginate(
        &self,
        document: &str,
        setup: &PageSetup,
        file_name: &str,
    ) -> Result<(), ExportError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let output = self.output_dir.join(file_name);
        if output.exists() {
            return Err(ExportError::Pagination(format!(
                "{} already exists",
                output.display()
            )));
        }

        let scratch = scratch_html(document)?;
        let args = Self::arguments(setup, scratch.path(), &output);

        log::debug!("export: running {} {}", self.program, args.join(" "));
        let result = tokio::process::Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|e| ExportError::Pagination(format!("cannot run `{}`: {e}", self.program)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ExportError::Pagination(format!(
                "`{}` exited with {}: {}",
                self.program,
                result.status,
                stderr.trim()
            )));
        }

        log::info!("export: saved {}", output.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportFormat;
    use tempfile::tempdir;

    fn artifact(name: &str, payload: &str) -> ExportArtifact {
        ExportArtifact {
            format: ExportFormat::MarkdownSource,
            file_name: name.into(),
            payload: payload.as_bytes().to_vec(),
        }
    }

    #[test]
    fn downloader_writes_payload() {
        let dir = tempdir().expect("temp dir");
        let downloader = FsDownloader::new(dir.path().join("exports"));

        downloader.save(&artifact("a.md", "# A")).expect("save");

        let written = std::fs::read_to_string(dir.path().join("exports/a.md")).unwrap();
        assert_eq!(written, "# A");
    }

    #[test]
    fn downloader_never_overwrites() {
        let dir = tempdir().expect("temp dir");
        let downloader = FsDownloader::new(dir.path());

        downloader.save(&artifact("a.md", "first")).expect("save");
        let second = downloader.save(&artifact("a.md", "second"));

        assert!(matches!(second, Err(ExportError::Download(_))));
        let written = std::fs::read_to_string(dir.path().join("a.md")).unwrap();
        assert_eq!(written, "first");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            // Accept a prefix, then fail.
            if buf.len() > 2 {
                Ok(2)
            } else {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "disk gone"))
            }
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_leaves_no_partial_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.md");
        std::fs::write(&path, "# Pa").expect("seed");

        let result = fill_or_discard(&path, BrokenPipe, b"# Partial report");

        assert!(matches!(result, Err(ExportError::Download(_))));
        assert!(!path.exists());
    }

    #[test]
    fn successful_write_keeps_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("whole.md");
        let file = std::fs::File::create(&path).expect("create");

        fill_or_discard(&path, file, b"# Whole").expect("write");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Whole");
    }

    #[test]
    fn paginator_arguments_carry_page_setup() {
        let args = CommandPaginator::arguments(
            &PageSetup::default(),
            Path::new("/tmp/in.html"),
            Path::new("/tmp/out.pdf"),
        );

        let joined = args.join(" ");
        assert!(joined.contains("--page-size Letter"));
        assert!(joined.contains("--orientation Portrait"));
        assert!(joined.contains("--margin-top 0.5in"));
        assert!(joined.contains("--margin-left 0.5in"));
        assert!(joined.contains("--image-dpi 192"));
        assert!(joined.contains("--image-quality 98"));
        assert!(joined.ends_with("/tmp/in.html /tmp/out.pdf"));
    }

    #[test]
    fn paginator_with_missing_program_is_not_ready() {
        let paginator = CommandPaginator::new("proformat-no-such-pdf-tool", ".");
        assert!(!paginator.is_ready());
    }

    #[test]
    fn printer_reports_missing_program() {
        let printer = CommandPrinter::new("proformat-no-such-print-tool");
        let result = printer.print("<html></html>");
        assert!(matches!(result, Err(ExportError::Print(_))));
    }

    #[test]
    fn scratch_file_holds_document() {
        let scratch = scratch_html("<p>hi</p>").expect("scratch");
        let content = std::fs::read_to_string(scratch.path()).unwrap();
        assert_eq!(content, "<p>hi</p>");
        assert!(scratch.path().extension().is_some_and(|e| e == "html"));
    }
}
