//! Application entry point for the ProFormat command line.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] (returns default on first run).
//! 3. Create a single-threaded [`tokio`] runtime.
//! 4. Read the input text (file argument or stdin).
//! 5. Build the generator and the [`FormatOrchestrator`]; submit.
//! 6. On failure, optionally offer "Try again" (re-issues the same request).
//! 7. Print the result, then run the requested exports / copy / print.

use std::io::{BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use proformat::{
    config::AppConfig,
    export::{render_preview, ExportFormat, Exporter, Theme},
    format::Tone,
    llm::generator_from_config,
    pipeline::{new_shared_state, FormatOrchestrator, RequestPhase},
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "proformat",
    version,
    about = "Rewrite rough text into a polished, structured document and export it"
)]
struct Cli {
    /// Input file; stdin when omitted
    input: Option<PathBuf>,

    /// professional, academic, casual, executive-summary or persuasive
    #[arg(long)]
    tone: Option<Tone>,

    /// Normalise grammar and punctuation (true) or preserve phrasing (false)
    #[arg(long, value_name = "BOOL")]
    fix_grammar: Option<bool>,

    /// Prepend a brief executive summary
    #[arg(long, value_name = "BOOL")]
    summary: Option<bool>,

    /// Export format(s): md, txt, html, doc, pdf
    #[arg(long = "export", value_name = "FORMAT")]
    exports: Vec<ExportFormat>,

    /// Directory for exported files
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Copy the formatted text to the clipboard
    #[arg(long)]
    copy: bool,

    /// Send the formatted document to the printer
    #[arg(long)]
    print: bool,

    /// Offer to try again when formatting fails; the answer is read from
    /// stdin, so the input must come from a file
    #[arg(long, requires = "input")]
    retry: bool,

    /// Write an HTML preview to stdout instead of markdown
    #[arg(long)]
    preview: bool,

    /// Ambient theme: light or dark (affects the preview only)
    #[arg(long, default_value = "light")]
    theme: Theme,

    /// Settings file; the platform default when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_input(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("cannot read stdin")?;
            Ok(text)
        }
    }
}

fn confirm_retry() -> bool {
    eprint!("Try again? [y/N] ");
    let _ = std::io::stderr().flush();
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<ExitCode> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    // 2. Configuration
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    };
    if let Some(dir) = &cli.out_dir {
        config.export.output_dir = Some(dir.clone());
    }

    // 3. Runtime (single-threaded; one logical request at a time)
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Input + options
    let input = read_input(cli.input.as_ref())?;
    let mut options = config.formatting;
    if let Some(tone) = cli.tone {
        options = options.with_tone(tone);
    }
    if let Some(fix) = cli.fix_grammar {
        options = options.with_fix_grammar(fix);
    }
    if let Some(summary) = cli.summary {
        options = options.with_include_summary(summary);
    }

    // 5. Submit
    let orchestrator = FormatOrchestrator::new(
        new_shared_state(config.formatting),
        generator_from_config(&config.generation),
    );
    orchestrator.set_input(input);
    orchestrator.set_options(options);

    eprintln!("Polishing your content... ({} tone)", options.tone);
    let mut phase = rt.block_on(orchestrator.submit_current());
    log::info!("status: {}", phase.label());

    // 6. Failure / retry loop
    while phase == RequestPhase::Failed {
        if let Some(failure) = orchestrator.failure() {
            eprintln!("Error processing request: {failure}");
        }
        if !(cli.retry && confirm_retry()) {
            return Ok(ExitCode::FAILURE);
        }
        phase = rt.block_on(orchestrator.retry());
        log::info!("status: {}", phase.label());
    }

    let Some(formatted) = orchestrator.formatted() else {
        eprintln!("Nothing to format: the input is empty.");
        return Ok(ExitCode::FAILURE);
    };

    // 7. Output + exports
    if cli.preview {
        println!("{}", render_preview(&formatted, cli.theme));
    } else {
        println!("{formatted}");
    }

    let exporter = Exporter::from_config(&config.export).with_ambient_theme(cli.theme);
    for format in &cli.exports {
        match rt.block_on(exporter.export_current(&orchestrator, *format)) {
            Ok(file) => eprintln!("Saved {format}: {file}"),
            Err(e) => eprintln!("{format} export failed: {e}"),
        }
    }

    if cli.copy && exporter.copy(&formatted) {
        eprintln!("Copied to clipboard.");
    }

    if cli.print {
        if let Err(e) = exporter.print(&formatted) {
            eprintln!("{e}");
        }
    }

    Ok(ExitCode::SUCCESS)
}
