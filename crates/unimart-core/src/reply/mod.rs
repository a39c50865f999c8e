//! Simulated counterpart replies.
//!
//! There is no real peer behind a demo negotiation, so a reply is
//! scheduled after a fixed delay to model a human counterpart on a slow
//! connection. The delayed append runs as a spawned task guarded by a
//! [`CancellationToken`]: if the owning store is discarded before the
//! delay elapses, the pending reply is dropped instead of landing in a
//! dead session.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use unimart_types::chat::{Message, Sender};

use crate::store::SessionStore;

/// How long a simulated counterpart takes to answer.
pub const REPLY_DELAY: Duration = Duration::from_secs(2);

/// The counterpart's repertoire. One is chosen uniformly at random.
pub const CANNED_REPLIES: [&str; 5] = [
    "Yes, it is available!",
    "Last price?",
    "Can we meet at the faculty?",
    "Okay, deal.",
    "I'm at the gate.",
];

/// Schedules delayed counterpart replies against a session store.
///
/// The token guards only the replies pending at a given moment;
/// [`shutdown`](Self::shutdown) swaps in a fresh one so the simulator
/// keeps working for sessions opened afterwards.
pub struct ReplySimulator {
    store: Arc<SessionStore>,
    cancel: Mutex<CancellationToken>,
}

impl ReplySimulator {
    pub fn new(store: Arc<SessionStore>) -> Self {
        ReplySimulator {
            store,
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    /// Schedule one canned reply to `session_id` after [`REPLY_DELAY`].
    ///
    /// Returns the task handle resolving to the appended message, or
    /// `None` if the simulator was shut down or the session no longer
    /// exists when the delay elapses. The reply never appears before
    /// the delay.
    pub fn schedule(&self, session_id: Uuid) -> JoinHandle<Option<Message>> {
        let store = Arc::clone(&self.store);
        let cancel = self
            .cancel
            .lock()
            .expect("cancellation token lock poisoned")
            .clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(session_id = %session_id, "Pending reply cancelled");
                    None
                }
                _ = tokio::time::sleep(REPLY_DELAY) => {
                    let text = CANNED_REPLIES[rand::rng().random_range(0..CANNED_REPLIES.len())];
                    match store.append(session_id, Sender::Counterpart, text) {
                        Ok(message) => Some(message),
                        Err(err) => {
                            // Session discarded while the reply was pending.
                            debug!(session_id = %session_id, error = %err, "Dropping simulated reply");
                            None
                        }
                    }
                }
            }
        })
    }

    /// Cancel all currently pending replies.
    ///
    /// Cancellation is permanent per token, so a fresh token replaces
    /// the old one: replies scheduled after a logout behave normally.
    pub fn shutdown(&self) {
        let mut guard = self
            .cancel
            .lock()
            .expect("cancellation token lock poisoned");
        let old = std::mem::replace(&mut *guard, CancellationToken::new());
        drop(guard);
        old.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unimart_types::listing::ListingRef;

    fn seeded_store() -> (Arc<SessionStore>, Uuid) {
        let store = Arc::new(SessionStore::new());
        let session_id = store.start_or_get(&ListingRef {
            id: Uuid::now_v7(),
            title: "Fairly used HP Pavilion".to_string(),
            counterpart_name: "Chinedu (Eng)".to_string(),
        });
        (store, session_id)
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_arrives_after_delay_from_canned_set() {
        let (store, session_id) = seeded_store();
        let simulator = ReplySimulator::new(Arc::clone(&store));

        let handle = simulator.schedule(session_id);
        // Let the task register its timer before moving the clock.
        tokio::task::yield_now().await;

        // Nothing lands before the delay.
        tokio::time::advance(REPLY_DELAY / 2).await;
        tokio::task::yield_now().await;
        assert_eq!(store.session(&session_id).unwrap().messages.len(), 1);

        tokio::time::advance(REPLY_DELAY).await;
        let message = handle.await.unwrap().expect("reply should land");

        assert_eq!(message.sender(), Sender::Counterpart);
        assert!(CANNED_REPLIES.contains(&message.text()));

        let session = store.session(&session_id).unwrap();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[1].id(), message.id());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_reply() {
        let (store, session_id) = seeded_store();
        let simulator = ReplySimulator::new(Arc::clone(&store));

        let handle = simulator.schedule(session_id);
        simulator.shutdown();

        tokio::time::advance(REPLY_DELAY * 2).await;
        assert!(handle.await.unwrap().is_none());
        assert_eq!(store.session(&session_id).unwrap().messages.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_after_shutdown_still_replies() {
        let (store, session_id) = seeded_store();
        let simulator = ReplySimulator::new(Arc::clone(&store));

        // A shutdown only affects replies pending at that moment.
        simulator.shutdown();

        let handle = simulator.schedule(session_id);
        tokio::task::yield_now().await;
        tokio::time::advance(REPLY_DELAY * 2).await;

        let message = handle.await.unwrap().expect("reply should land");
        assert_eq!(message.sender(), Sender::Counterpart);
        assert_eq!(store.session(&session_id).unwrap().messages.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_to_cleared_store_is_dropped() {
        let (store, session_id) = seeded_store();
        let simulator = ReplySimulator::new(Arc::clone(&store));

        let handle = simulator.schedule(session_id);
        store.clear();

        tokio::time::advance(REPLY_DELAY * 2).await;
        assert!(handle.await.unwrap().is_none());
    }
}
