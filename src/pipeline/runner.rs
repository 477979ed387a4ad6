//! Request orchestrator: drives one formatting request at a time.
//!
//! [`FormatOrchestrator`] owns the [`SharedState`] and the injected
//! [`TextGenerator`].
//!
//! # Request flow
//!
//! ```text
//! submit(raw, options)
//!   └─▶ begin: reject blank input, snapshot request, new token,
//!              clear previous result                       [Submitting]
//!         └─▶ dispatch: PromptBuilder::build → generator.generate (async)
//!               └─▶ resolve(token, outcome)
//!                     ├─ stale token → discarded
//!                     ├─ Ok  → store text                   [Succeeded]
//!                     └─ Err → store FailureKind::Generation [Failed]
//!
//! retry()  (Failed only) → re-dispatch last request under a new token
//! clear()                → Idle; invalidates every outstanding token
//! ```
//!
//! The outstanding call is never aborted.  Superseding it only guarantees
//! that its eventual outcome is ignored.

use std::sync::{Arc, MutexGuard, PoisonError};

use crate::format::{FormattingOptions, PromptBuilder};
use crate::llm::{GenerationFailure, TextGenerator};

use super::state::{
    AppState, FailureKind, FormatRequest, RequestPhase, RequestToken, SharedState,
};

// ---------------------------------------------------------------------------
// FormatOrchestrator
// ---------------------------------------------------------------------------

/// Owns the request lifecycle.
///
/// All methods take `&self`, so an orchestrator behind an `Arc` can have a
/// superseded request still awaiting its response while a newer one is
/// dispatched.
///
/// ```rust,no_run
/// use proformat::config::AppConfig;
/// use proformat::llm::generator_from_config;
/// use proformat::pipeline::{new_shared_state, FormatOrchestrator, RequestPhase};
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let state = new_shared_state(config.formatting);
/// let orchestrator = FormatOrchestrator::new(state, generator_from_config(&config.generation));
///
/// if orchestrator.submit("q3 budget notes", config.formatting).await == RequestPhase::Succeeded {
///     println!("{}", orchestrator.formatted().unwrap_or_default());
/// }
/// # }
/// ```
pub struct FormatOrchestrator {
    state: SharedState,
    generator: Arc<dyn TextGenerator>,
}

impl FormatOrchestrator {
    pub fn new(state: SharedState, generator: Arc<dyn TextGenerator>) -> Self {
        Self { state, generator }
    }

    /// Handle to the shared state, for front ends.
    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    pub fn phase(&self) -> RequestPhase {
        self.lock().phase
    }

    /// Formatted text of the latest successful request.
    pub fn formatted(&self) -> Option<String> {
        self.lock().formatted.clone()
    }

    pub fn failure(&self) -> Option<FailureKind> {
        self.lock().failure
    }

    // -----------------------------------------------------------------------
    // Live input
    // -----------------------------------------------------------------------

    /// Replace the live input.  Never affects a submitted request.
    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().input = text.into();
    }

    /// Replace the live options.  Never affects a submitted request.
    pub fn set_options(&self, options: FormattingOptions) {
        self.lock().options = options;
    }

    /// Submit the live input with the live options.
    pub async fn submit_current(&self) -> RequestPhase {
        let (raw, options) = {
            let st = self.lock();
            (st.input.clone(), st.options)
        };
        self.submit(&raw, options).await
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Submit `raw` with `options` and wait for the outcome.
    ///
    /// Blank input is a no-op: the phase is returned unchanged and the
    /// generator is not called.
    pub async fn submit(&self, raw: &str, options: FormattingOptions) -> RequestPhase {
        match self.begin(raw, options) {
            Some(request) => self.dispatch(request).await,
            None => self.phase(),
        }
    }

    /// Enter `Submitting` for a new request snapshot.
    ///
    /// Returns `None` (and changes nothing) when `raw` is empty or
    /// whitespace-only.  Otherwise the previous result is cleared at once,
    /// any outstanding request becomes stale, and the returned request must
    /// be passed to [`dispatch`](Self::dispatch).
    pub fn begin(&self, raw: &str, options: FormattingOptions) -> Option<FormatRequest> {
        if raw.trim().is_empty() {
            log::debug!("orchestrator: ignoring submit with empty input");
            return None;
        }

        let mut st = self.lock();
        let request = FormatRequest {
            raw_text: raw.to_string(),
            options,
            token: Self::next_token(&mut st),
        };
        Self::enter_submitting(&mut st, request.clone());

        log::debug!(
            "orchestrator: request #{} submitted (len={}, tone={})",
            request.token,
            request.raw_text.len(),
            request.options.tone
        );
        Some(request)
    }

    /// Send `request` to the generator and resolve it.
    pub async fn dispatch(&self, request: FormatRequest) -> RequestPhase {
        let prompt = PromptBuilder::build(&request.raw_text, &request.options);
        let outcome = self.generator.generate(&prompt).await;
        self.resolve(request.token, outcome);
        self.phase()
    }

    /// Apply `outcome` if `token` belongs to the newest request and that
    /// request is still outstanding.  Returns whether state changed.
    pub fn resolve(
        &self,
        token: RequestToken,
        outcome: Result<String, GenerationFailure>,
    ) -> bool {
        let mut st = self.lock();

        if token != st.current_token || st.phase != RequestPhase::Submitting {
            log::debug!(
                "orchestrator: discarding stale response #{token} (current #{}, {:?})",
                st.current_token,
                st.phase
            );
            return false;
        }

        match outcome {
            Ok(text) => {
                log::debug!("orchestrator: request #{token} succeeded (len={})", text.len());
                st.phase = RequestPhase::Succeeded;
                st.formatted = Some(text);
                st.failure = None;
            }
            Err(e) => {
                log::error!("orchestrator: request #{token} failed: {}", e.detail());
                st.phase = RequestPhase::Failed;
                st.formatted = None;
                st.failure = Some(FailureKind::Generation);
            }
        }
        true
    }

    /// Re-issue the last submitted request, exactly as it was submitted.
    ///
    /// Only valid from `Failed`; from any other phase this is a no-op that
    /// returns the current phase.
    pub async fn retry(&self) -> RequestPhase {
        let request = {
            let mut st = self.lock();
            if st.phase != RequestPhase::Failed {
                log::debug!("orchestrator: retry ignored in {:?}", st.phase);
                return st.phase;
            }
            let Some(last) = st.last_request.clone() else {
                return st.phase;
            };
            let request = FormatRequest {
                token: Self::next_token(&mut st),
                ..last
            };
            Self::enter_submitting(&mut st, request.clone());
            request
        };

        log::debug!("orchestrator: retrying as request #{}", request.token);
        self.dispatch(request).await
    }

    /// Return to `Idle`, dropping input, result and failure.  Any response
    /// still in flight is ignored when it arrives.
    pub fn clear(&self) {
        let mut st = self.lock();
        Self::next_token(&mut st);
        st.phase = RequestPhase::Idle;
        st.formatted = None;
        st.failure = None;
        st.last_request = None;
        st.input.clear();
        log::debug!("orchestrator: cleared");
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_token(st: &mut AppState) -> RequestToken {
        st.current_token += 1;
        st.current_token
    }

    fn enter_submitting(st: &mut AppState, request: FormatRequest) {
        st.phase = RequestPhase::Submitting;
        st.formatted = None;
        st.failure = None;
        st.last_request = Some(request);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Tone;
    use crate::pipeline::state::new_shared_state;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Replies from a script (`None` = failure), repeating the last entry,
    /// and records every prompt it receives.
    struct ScriptedGenerator {
        replies: Mutex<VecDeque<Option<String>>>,
        last: Mutex<Option<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<Option<&str>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().map(|r| r.map(String::from)).collect()),
                last: Mutex::new(None),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn ok(text: &str) -> Arc<Self> {
            Self::new(vec![Some(text)])
        }

        fn failing() -> Arc<Self> {
            Self::new(vec![None])
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationFailure> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let reply = {
                let mut replies = self.replies.lock().unwrap();
                let mut last = self.last.lock().unwrap();
                if let Some(next) = replies.pop_front() {
                    *last = next;
                }
                last.clone()
            };
            reply.ok_or_else(|| GenerationFailure::new("scripted failure"))
        }
    }

    /// Echoes the prompt's raw text; prompts containing "slow" wait for the
    /// gate to open first.
    struct GatedEcho {
        gate: Notify,
    }

    #[async_trait]
    impl TextGenerator for GatedEcho {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationFailure> {
            if prompt.contains("slow") {
                self.gate.notified().await;
            }
            let raw = prompt.rsplit("Raw Text:\n").next().unwrap_or_default();
            Ok(format!("# {raw}"))
        }
    }

    fn orchestrator(generator: Arc<dyn TextGenerator>) -> FormatOrchestrator {
        FormatOrchestrator::new(new_shared_state(FormattingOptions::default()), generator)
    }

    const NOTES: &str = "meeting notes: discussed q3 budget. need approval by friday.";

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn successful_request_stores_exact_text() {
        let reply = "## Summary\nBudget needs sign-off.\n## Q3 Budget Discussion\n- approval by Friday";
        let generator = ScriptedGenerator::ok(reply);
        let orc = orchestrator(generator.clone());
        let options = FormattingOptions {
            tone: Tone::Academic,
            fix_grammar: true,
            include_summary: true,
        };

        let phase = orc.submit(NOTES, options).await;

        assert_eq!(phase, RequestPhase::Succeeded);
        assert_eq!(orc.formatted().as_deref(), Some(reply));
        assert!(orc.failure().is_none());

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Academic"));
        assert!(prompts[0].contains("ensure perfect grammar"));
        assert!(prompts[0].contains("executive summary"));
        assert!(prompts[0].ends_with(NOTES));
    }

    #[tokio::test]
    async fn blank_input_never_leaves_idle() {
        let generator = ScriptedGenerator::ok("unused");
        let orc = orchestrator(generator.clone());

        for blank in ["", "   ", "\n\t \n"] {
            let phase = orc.submit(blank, FormattingOptions::default()).await;
            assert_eq!(phase, RequestPhase::Idle);
        }

        assert!(generator.prompts().is_empty());
        assert!(orc.state().lock().unwrap().last_request.is_none());
    }

    #[tokio::test]
    async fn blank_input_after_success_keeps_result() {
        let orc = orchestrator(ScriptedGenerator::ok("# Done"));
        orc.submit(NOTES, FormattingOptions::default()).await;

        let phase = orc.submit("  ", FormattingOptions::default()).await;

        assert_eq!(phase, RequestPhase::Succeeded);
        assert_eq!(orc.formatted().as_deref(), Some("# Done"));
    }

    #[tokio::test]
    async fn failing_generator_reaches_failed_without_text() {
        let orc = orchestrator(ScriptedGenerator::failing());

        let phase = orc.submit(NOTES, FormattingOptions::default()).await;

        assert_eq!(phase, RequestPhase::Failed);
        assert_eq!(orc.failure(), Some(FailureKind::Generation));
        assert!(orc.formatted().is_none());
    }

    #[tokio::test]
    async fn begin_clears_previous_result_immediately() {
        let orc = orchestrator(ScriptedGenerator::ok("# First"));
        orc.submit(NOTES, FormattingOptions::default()).await;
        assert!(orc.formatted().is_some());

        let request = orc.begin("second input", FormattingOptions::default());

        assert!(request.is_some());
        assert_eq!(orc.phase(), RequestPhase::Submitting);
        assert!(orc.formatted().is_none());
    }

    #[tokio::test]
    async fn later_resolution_of_older_request_is_discarded() {
        let generator = ScriptedGenerator::new(vec![Some("# B"), Some("# A")]);
        let orc = orchestrator(generator);

        let a = orc.begin("request a", FormattingOptions::default()).unwrap();
        let b = orc.begin("request b", FormattingOptions::default()).unwrap();
        assert!(b.token > a.token);

        assert_eq!(orc.dispatch(b).await, RequestPhase::Succeeded);
        assert_eq!(orc.dispatch(a).await, RequestPhase::Succeeded);

        assert_eq!(orc.formatted().as_deref(), Some("# B"));
    }

    #[tokio::test]
    async fn stale_failure_does_not_override_newer_success() {
        let orc = orchestrator(ScriptedGenerator::ok("# B"));

        let a = orc.begin("request a", FormattingOptions::default()).unwrap();
        let b = orc.begin("request b", FormattingOptions::default()).unwrap();
        orc.dispatch(b).await;

        let applied = orc.resolve(a.token, Err(GenerationFailure::new("late timeout")));

        assert!(!applied);
        assert_eq!(orc.phase(), RequestPhase::Succeeded);
        assert_eq!(orc.formatted().as_deref(), Some("# B"));
    }

    #[tokio::test]
    async fn concurrent_superseded_request_is_ignored() {
        let generator = Arc::new(GatedEcho {
            gate: Notify::new(),
        });
        let orc = Arc::new(orchestrator(generator.clone()));

        let slow = orc.begin("slow draft", FormattingOptions::default()).unwrap();
        let pending = tokio::spawn({
            let orc = Arc::clone(&orc);
            async move { orc.dispatch(slow).await }
        });

        let phase = orc.submit("edited draft", FormattingOptions::default()).await;
        assert_eq!(phase, RequestPhase::Succeeded);

        generator.gate.notify_one();
        pending.await.unwrap();

        assert_eq!(orc.formatted().as_deref(), Some("# edited draft"));
    }

    #[tokio::test]
    async fn retry_reissues_last_submitted_request() {
        let generator = ScriptedGenerator::new(vec![None, Some("# Recovered")]);
        let orc = orchestrator(generator.clone());
        let options = FormattingOptions::default().with_tone(Tone::Persuasive);

        assert_eq!(orc.submit(NOTES, options).await, RequestPhase::Failed);

        // Edits after the failure must not leak into the retry.
        orc.set_input("something else entirely");
        orc.set_options(options.with_tone(Tone::Casual).with_fix_grammar(false));

        assert_eq!(orc.retry().await, RequestPhase::Succeeded);
        assert_eq!(orc.formatted().as_deref(), Some("# Recovered"));

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0], prompts[1]);
    }

    #[tokio::test]
    async fn always_failing_retry_uses_same_prompt() {
        let generator = ScriptedGenerator::failing();
        let orc = orchestrator(generator.clone());

        orc.submit(NOTES, FormattingOptions::default()).await;
        assert_eq!(orc.retry().await, RequestPhase::Failed);
        assert_eq!(orc.retry().await, RequestPhase::Failed);

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts.iter().all(|p| p == &prompts[0]));
    }

    #[tokio::test]
    async fn retry_outside_failed_is_noop() {
        let generator = ScriptedGenerator::ok("# Ok");
        let orc = orchestrator(generator.clone());

        assert_eq!(orc.retry().await, RequestPhase::Idle);
        orc.submit(NOTES, FormattingOptions::default()).await;
        assert_eq!(orc.retry().await, RequestPhase::Succeeded);

        assert_eq!(generator.prompts().len(), 1);
    }

    #[tokio::test]
    async fn clear_suppresses_in_flight_response() {
        let orc = orchestrator(ScriptedGenerator::ok("# Late"));
        orc.set_input(NOTES);

        let request = orc.begin(NOTES, FormattingOptions::default()).unwrap();
        orc.clear();
        let phase = orc.dispatch(request).await;

        assert_eq!(phase, RequestPhase::Idle);
        assert!(orc.formatted().is_none());
        assert!(orc.state().lock().unwrap().input.is_empty());
    }

    #[tokio::test]
    async fn clear_after_failure_disables_retry() {
        let generator = ScriptedGenerator::failing();
        let orc = orchestrator(generator.clone());
        orc.submit(NOTES, FormattingOptions::default()).await;

        orc.clear();

        assert_eq!(orc.phase(), RequestPhase::Idle);
        assert!(orc.failure().is_none());
        assert_eq!(orc.retry().await, RequestPhase::Idle);
        assert_eq!(generator.prompts().len(), 1);
    }

    #[tokio::test]
    async fn options_are_snapshotted_at_submit() {
        let generator = ScriptedGenerator::ok("# Ok");
        let orc = orchestrator(generator.clone());

        let request = orc
            .begin(NOTES, FormattingOptions::default().with_tone(Tone::Academic))
            .unwrap();
        orc.set_options(FormattingOptions::default().with_tone(Tone::Casual));
        orc.dispatch(request).await;

        let prompts = generator.prompts();
        assert!(prompts[0].contains("Tone: Academic"));
    }

    #[tokio::test]
    async fn submit_current_uses_live_input_and_options() {
        let generator = ScriptedGenerator::ok("# Ok");
        let orc = orchestrator(generator.clone());
        orc.set_input(NOTES);
        orc.set_options(FormattingOptions::default().with_include_summary(true));

        assert_eq!(orc.submit_current().await, RequestPhase::Succeeded);
        let last = orc.state().lock().unwrap().last_request.clone().unwrap();
        assert_eq!(last.raw_text, NOTES);
        assert!(last.options.include_summary);
    }
}
