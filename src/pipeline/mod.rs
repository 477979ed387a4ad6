//! Request orchestration for ProFormat.
//!
//! This module owns the lifecycle of a formatting request and exposes the
//! shared state front ends read.
//!
//! # Architecture
//!
//! ```text
//! raw text + FormattingOptions
//!        │
//!        ▼
//! FormatOrchestrator::submit()      ← async, one logical request at a time
//!        │
//!        ├─ begin     → snapshot request, new token          [Submitting]
//!        ├─ PromptBuilder::build
//!        ├─ TextGenerator::generate (async, no retries)
//!        └─ resolve   → newest token only                    [Succeeded | Failed]
//!
//! SharedState (Arc<Mutex<AppState>>) ←─── read by the front end / exporter
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use proformat::config::AppConfig;
//! use proformat::llm::generator_from_config;
//! use proformat::pipeline::{new_shared_state, FormatOrchestrator, RequestPhase};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let orchestrator = FormatOrchestrator::new(
//!         new_shared_state(config.formatting),
//!         generator_from_config(&config.generation),
//!     );
//!
//!     let mut phase = orchestrator.submit("rough notes", config.formatting).await;
//!     if phase == RequestPhase::Failed {
//!         phase = orchestrator.retry().await;
//!     }
//!     println!("{}", phase.label());
//! }
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::FormatOrchestrator;
pub use state::{
    new_shared_state, AppState, FailureKind, FormatRequest, RequestPhase, RequestToken,
    SharedState,
};
