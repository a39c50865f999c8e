//! Chat-safety advisory pipeline.
//!
//! On every mutation of a session's message log the advisor re-runs an
//! external classifier over the newest messages and publishes the
//! verdict back onto the session. The pipeline is strictly advisory:
//! it never blocks an append, never mutates the log, and absorbs every
//! classifier failure into the safe default (fail open).
//!
//! Evaluations may be superseded. Each re-evaluation takes a
//! per-session sequence number; a result is published only if no newer
//! evaluation has started since, so a stale in-flight result can never
//! overwrite the verdict for a newer message window.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::{debug, warn};
use uuid::Uuid;

use unimart_types::error::GenAiError;
use unimart_types::safety::SafetyVerdict;

use crate::store::SessionStore;

/// How many of the newest messages are sent to the classifier.
///
/// Bounds payload size and keeps the judgment focused on recent
/// behavior; oldest messages are dropped first.
pub const WINDOW: usize = 5;

/// Trailing-edge debounce applied before each classifier call.
///
/// Rapid successive appends (user message plus simulated reply) would
/// otherwise fire one classifier request per append; the debounce
/// coalesces them into a single call for the final window.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Trait for conversation-safety classifier backends.
///
/// `window` is the newest message texts, oldest first, length at most
/// [`WINDOW`]. Uses native async fn in traits (RPITIT, Rust 2024
/// edition). Implementations live in unimart-infra (e.g.,
/// `GeminiClient`).
pub trait SafetyClassifier: Send + Sync {
    fn classify(
        &self,
        window: &[String],
    ) -> impl std::future::Future<Output = Result<SafetyVerdict, GenAiError>> + Send;
}

#[derive(Debug, Default)]
struct EvalState {
    /// Sequence number of the most recently started evaluation.
    latest: u64,
    /// Sequence number of the most recently published verdict.
    published: u64,
}

/// Re-evaluates conversations against a [`SafetyClassifier`] and
/// publishes verdicts to the session store.
pub struct SafetyAdvisor<C> {
    classifier: C,
    store: Arc<SessionStore>,
    evals: DashMap<Uuid, EvalState>,
}

impl<C: SafetyClassifier> SafetyAdvisor<C> {
    pub fn new(classifier: C, store: Arc<SessionStore>) -> Self {
        SafetyAdvisor {
            classifier,
            store,
            evals: DashMap::new(),
        }
    }

    /// Run the classifier over a message window, failing open.
    ///
    /// Any classifier failure (network, malformed response, timeout) is
    /// logged and mapped to the safe default. This method never returns
    /// an error and never panics: a third-party outage must not degrade
    /// the ability to chat.
    pub async fn evaluate(&self, window: &[String]) -> SafetyVerdict {
        match self.classifier.classify(window).await {
            Ok(verdict) => verdict,
            Err(err) => {
                warn!(error = %err, "Safety classifier failed, failing open");
                SafetyVerdict::default()
            }
        }
    }

    /// Re-evaluate a session's current message window and publish the
    /// verdict, unless superseded.
    ///
    /// Sleeps [`DEBOUNCE`] first; if a newer evaluation for the same
    /// session starts during the sleep, this one aborts without calling
    /// the classifier at all.
    pub async fn review(&self, session_id: Uuid) {
        let seq = self.begin(session_id);

        tokio::time::sleep(DEBOUNCE).await;
        if !self.is_current(session_id, seq) {
            debug!(session_id = %session_id, seq, "Evaluation coalesced by a newer append");
            return;
        }

        let window = match self.store.recent_texts(&session_id, WINDOW) {
            Ok(window) if !window.is_empty() => window,
            Ok(_) => return,
            Err(_) => {
                // Session discarded; drop its evaluation state too.
                self.evals.remove(&session_id);
                return;
            }
        };

        let verdict = self.evaluate(&window).await;

        if self.publish(session_id, seq) {
            debug!(session_id = %session_id, seq, is_safe = verdict.is_safe, "Verdict published");
            if self.store.set_verdict(session_id, verdict).is_err() {
                debug!(session_id = %session_id, "Session gone before verdict landed");
            }
        } else {
            debug!(session_id = %session_id, seq, "Stale verdict discarded");
        }
    }

    /// Drop all per-session evaluation state.
    ///
    /// Called when the session store is cleared so the sequence map
    /// does not accumulate entries for discarded sessions.
    pub fn clear(&self) {
        self.evals.clear();
    }

    #[cfg(test)]
    pub(crate) fn classifier(&self) -> &C {
        &self.classifier
    }

    fn begin(&self, session_id: Uuid) -> u64 {
        let mut state = self.evals.entry(session_id).or_default();
        state.latest += 1;
        state.latest
    }

    fn is_current(&self, session_id: Uuid, seq: u64) -> bool {
        self.evals
            .get(&session_id)
            .map(|state| state.latest == seq)
            .unwrap_or(false)
    }

    /// Claim the right to publish the verdict for `seq`.
    ///
    /// Last-write-wins on the verdict display: a result is accepted
    /// only if no later evaluation has already published.
    fn publish(&self, session_id: Uuid, seq: u64) -> bool {
        let mut state = self.evals.entry(session_id).or_default();
        if seq > state.published {
            state.published = seq;
            true
        } else {
            false
        }
    }
}

impl<C: SafetyClassifier + 'static> SafetyAdvisor<C> {
    /// Fire off a [`review`](Self::review) as a detached task.
    ///
    /// This is the non-blocking trigger invoked after every append.
    pub fn spawn_review(self: &Arc<Self>, session_id: Uuid) {
        let advisor = Arc::clone(self);
        tokio::spawn(async move {
            advisor.review(session_id).await;
        });
    }
}
