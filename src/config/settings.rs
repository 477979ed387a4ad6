//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::export::PageSetup;
use crate::format::FormattingOptions;

// ---------------------------------------------------------------------------
// GenerationProvider
// ---------------------------------------------------------------------------

/// Selects which text-generation backend rewrites the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationProvider {
    /// Google Gemini `generateContent` REST API.
    Gemini,
    /// Any OpenAI-compatible REST API (OpenAI, Groq, Ollama, LM Studio …).
    OpenAiCompatible,
}

impl Default for GenerationProvider {
    fn default() -> Self {
        Self::Gemini
    }
}

// ---------------------------------------------------------------------------
// GenerationConfig
// ---------------------------------------------------------------------------

/// Environment variables consulted, in order, when no API key is configured.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Settings for the external text-generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Which backend to use.
    pub provider: GenerationProvider,
    /// Base URL of the API endpoint.
    ///
    /// - Gemini default: `https://generativelanguage.googleapis.com`
    /// - OpenAI: `https://api.openai.com`
    pub base_url: String,
    /// API key.  When `None`, see [`GenerationConfig::resolved_api_key`].
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a response before the request fails.
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: GenerationProvider::default(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            model: "gemini-2.5-flash".into(),
            temperature: 0.4,
            timeout_secs: 60,
        }
    }
}

impl GenerationConfig {
    /// The API key to send: the configured one if non-empty, otherwise the
    /// first non-empty variable of [`API_KEY_ENV_VARS`].
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .filter_map(|var| std::env::var(var).ok())
                    .find(|k| !k.is_empty())
            })
    }
}

// ---------------------------------------------------------------------------
// ExportConfig
// ---------------------------------------------------------------------------

/// Settings for the export stage (downloads, printing, PDF rendering).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory that downloads are written to.  `None` means the current
    /// working directory.
    pub output_dir: Option<PathBuf>,
    /// Prefix of every generated filename.
    pub filename_prefix: String,
    /// HTML → PDF converter invoked for paginated documents.
    pub pdf_command: String,
    /// Command that receives the printable HTML file as its last argument.
    pub print_command: String,
    /// Page setup handed to the paginator.
    pub page: PageSetup,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            filename_prefix: "proformat-export".into(),
            pdf_command: "wkhtmltopdf".into(),
            print_command: "lp".into(),
            page: PageSetup::default(),
        }
    }
}

impl ExportConfig {
    /// Output directory with the `None` → `.` fallback applied.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use proformat::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Generation service settings.
    pub generation: GenerationConfig,
    /// Formatting options used when the caller does not override them.
    pub formatting: FormattingOptions,
    /// Export settings.
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::Orientation;
    use crate::format::Tone;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.generation.provider, loaded.generation.provider);
        assert_eq!(original.generation.base_url, loaded.generation.base_url);
        assert_eq!(original.generation.api_key, loaded.generation.api_key);
        assert_eq!(original.generation.model, loaded.generation.model);
        assert_eq!(
            original.generation.timeout_secs,
            loaded.generation.timeout_secs
        );
        assert_eq!(original.formatting, loaded.formatting);
        assert_eq!(original.export.filename_prefix, loaded.export.filename_prefix);
        assert_eq!(original.export.page, loaded.export.page);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");

        assert_eq!(config.generation.model, "gemini-2.5-flash");
        assert_eq!(config.formatting, FormattingOptions::default());
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.generation.provider, GenerationProvider::Gemini);
        assert_eq!(
            cfg.generation.base_url,
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(cfg.generation.timeout_secs, 60);
        assert!(cfg.generation.api_key.is_none());
        assert_eq!(cfg.formatting.tone, Tone::Professional);
        assert!(cfg.formatting.fix_grammar);
        assert!(!cfg.formatting.include_summary);
        assert_eq!(cfg.export.filename_prefix, "proformat-export");
        assert_eq!(cfg.export.pdf_command, "wkhtmltopdf");
        assert_eq!(cfg.export.resolved_output_dir(), PathBuf::from("."));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "[formatting]\ntone = \"Academic\"\nfix_grammar = false\ninclude_summary = true\n",
        )
        .expect("write");

        let cfg = AppConfig::load_from(&path).expect("load");

        assert_eq!(cfg.formatting.tone, Tone::Academic);
        assert!(!cfg.formatting.fix_grammar);
        assert!(cfg.formatting.include_summary);
        assert_eq!(cfg.generation.model, "gemini-2.5-flash");
        assert_eq!(cfg.export.page.orientation, Orientation::Portrait);
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.generation.provider = GenerationProvider::OpenAiCompatible;
        cfg.generation.base_url = "https://api.openai.com".into();
        cfg.generation.api_key = Some("sk-test".into());
        cfg.generation.model = "gpt-4o-mini".into();
        cfg.formatting = cfg.formatting.with_tone(Tone::Persuasive);
        cfg.export.output_dir = Some(PathBuf::from("/tmp/exports"));

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(
            loaded.generation.provider,
            GenerationProvider::OpenAiCompatible
        );
        assert_eq!(loaded.generation.api_key, Some("sk-test".into()));
        assert_eq!(loaded.generation.model, "gpt-4o-mini");
        assert_eq!(loaded.formatting.tone, Tone::Persuasive);
        assert_eq!(
            loaded.export.output_dir,
            Some(PathBuf::from("/tmp/exports"))
        );
    }

    #[test]
    fn configured_api_key_wins_over_environment() {
        let cfg = GenerationConfig {
            api_key: Some("from-config".into()),
            ..GenerationConfig::default()
        };
        assert_eq!(cfg.resolved_api_key().as_deref(), Some("from-config"));
    }
}
