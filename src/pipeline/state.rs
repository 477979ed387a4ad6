//! Request phase state machine and shared application state.
//!
//! [`RequestPhase`] is the orchestrator's state.  [`AppState`] is the single
//! source of truth for everything a front end needs: the current phase, the
//! latest result or failure, the last submitted request, and the live
//! (not yet submitted) input and options.
//!
//! [`SharedState`] is a type alias for `Arc<Mutex<AppState>>`, cheap to clone
//! and safe to share across threads.

use std::sync::{Arc, Mutex};

use crate::format::FormattingOptions;

// ---------------------------------------------------------------------------
// RequestPhase
// ---------------------------------------------------------------------------

/// Phases of a formatting request.
///
/// ```text
/// Idle ──submit (non-empty)──▶ Submitting
/// Succeeded / Failed ──submit──▶ Submitting
/// Submitting ──resolve Ok──▶ Succeeded
/// Submitting ──resolve Err─▶ Failed
/// Failed ──retry──▶ Submitting   (same request snapshot)
/// any ──clear──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    /// Nothing submitted, or cleared.
    #[default]
    Idle,
    /// A request is outstanding with the generation service.
    Submitting,
    /// The latest request returned formatted text.
    Succeeded,
    /// The latest request failed.
    Failed,
}

impl RequestPhase {
    /// Returns `true` while a request is outstanding.
    ///
    /// ```
    /// use proformat::pipeline::RequestPhase;
    ///
    /// assert!(!RequestPhase::Idle.is_busy());
    /// assert!(RequestPhase::Submitting.is_busy());
    /// assert!(!RequestPhase::Succeeded.is_busy());
    /// assert!(!RequestPhase::Failed.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, RequestPhase::Submitting)
    }

    /// A short human-readable label suitable for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            RequestPhase::Idle => "Idle",
            RequestPhase::Submitting => "Formatting...",
            RequestPhase::Succeeded => "Done",
            RequestPhase::Failed => "Error",
        }
    }
}

// ---------------------------------------------------------------------------
// FailureKind
// ---------------------------------------------------------------------------

/// User-facing classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The generation service failed for any reason.
    Generation,
}

impl FailureKind {
    pub fn message(&self) -> &'static str {
        match self {
            FailureKind::Generation => {
                "Something went wrong with the AI service. Please check your connection or API limit."
            }
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

// ---------------------------------------------------------------------------
// FormatRequest
// ---------------------------------------------------------------------------

/// Monotonic request identifier.  Only the newest token may update state.
pub type RequestToken = u64;

/// Immutable snapshot of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRequest {
    pub raw_text: String,
    pub options: FormattingOptions,
    pub token: RequestToken,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Shared application state.
///
/// Held behind [`SharedState`].  Only the orchestrator mutates `phase`,
/// `formatted`, `failure` and `last_request`; front ends read them and may
/// edit `input` / `options` through the orchestrator.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current phase of the request state machine.
    pub phase: RequestPhase,

    /// Formatted text of the latest successful request.
    ///
    /// `Some` only in [`RequestPhase::Succeeded`].
    pub formatted: Option<String>,

    /// Classification of the latest failure.
    ///
    /// `Some` only in [`RequestPhase::Failed`].
    pub failure: Option<FailureKind>,

    /// The most recently submitted request; re-issued by retry.
    pub last_request: Option<FormatRequest>,

    /// Live input text, possibly edited after the last submission.
    pub input: String,

    /// Live formatting options, possibly edited after the last submission.
    pub options: FormattingOptions,

    /// Token of the newest issued request.  Bumped by submit, retry and
    /// clear; a resolution carrying any other token is stale.
    pub(crate) current_token: RequestToken,
}

impl AppState {
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`AppState`].
///
/// Lock for a short critical section only; never hold the lock across
/// `.await` points.
pub type SharedState = Arc<Mutex<AppState>>;

/// Construct a new [`SharedState`] starting in `Idle` with `options` as the
/// live options.
pub fn new_shared_state(options: FormattingOptions) -> SharedState {
    Arc::new(Mutex::new(AppState::new(options)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
