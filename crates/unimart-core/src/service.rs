//! Chat service wiring the store, the safety advisor, and the reply
//! simulator together.
//!
//! This is the façade the presentation layer talks to. Every append
//! routed through it triggers a safety re-evaluation as a detached
//! task, so sending is never blocked by the advisory pipeline.

use std::sync::Arc;

use uuid::Uuid;

use unimart_types::chat::{ChatSession, Message, Sender};
use unimart_types::error::ChatError;
use unimart_types::listing::ListingRef;
use unimart_types::safety::SafetyVerdict;

use crate::advisor::{SafetyAdvisor, SafetyClassifier};
use crate::reply::ReplySimulator;
use crate::store::SessionStore;

/// In-process chat façade for the marketplace UI.
pub struct ChatService<C: SafetyClassifier + 'static> {
    store: Arc<SessionStore>,
    advisor: Arc<SafetyAdvisor<C>>,
    replies: ReplySimulator,
}

impl<C: SafetyClassifier + 'static> ChatService<C> {
    /// Build a service around a fresh store and the given classifier.
    ///
    /// Must be called within a tokio runtime: appends spawn advisory
    /// and simulated-reply tasks.
    pub fn new(classifier: C) -> Self {
        let store = Arc::new(SessionStore::new());
        let advisor = Arc::new(SafetyAdvisor::new(classifier, Arc::clone(&store)));
        let replies = ReplySimulator::new(Arc::clone(&store));
        ChatService {
            store,
            advisor,
            replies,
        }
    }

    /// The underlying session store (read access for the UI).
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// The advisory pipeline.
    pub fn advisor(&self) -> &Arc<SafetyAdvisor<C>> {
        &self.advisor
    }

    /// Open (or return to) the negotiation for a listing.
    ///
    /// Idempotent per listing. Kicks off an initial safety review of
    /// the seeded conversation.
    pub fn open_chat(&self, listing: &ListingRef) -> Uuid {
        let session_id = self.store.start_or_get(listing);
        self.advisor.spawn_review(session_id);
        session_id
    }

    /// Send a message as the local user.
    ///
    /// Appends synchronously, then schedules (without blocking) the
    /// safety re-evaluation and a simulated counterpart reply. The
    /// reply's append re-evaluates again once it lands.
    pub fn send(&self, session_id: Uuid, text: &str) -> Result<Message, ChatError> {
        let message = self.store.append(session_id, Sender::Own, text)?;
        self.advisor.spawn_review(session_id);
        self.schedule_reply(session_id);
        Ok(message)
    }

    /// Current advisory verdict for a session.
    pub fn verdict(&self, session_id: Uuid) -> Result<SafetyVerdict, ChatError> {
        self.store.verdict(&session_id)
    }

    /// Snapshot of all sessions, for the deals list.
    pub fn sessions(&self) -> Vec<ChatSession> {
        self.store.sessions()
    }

    /// Drop all chat state and cancel pending replies (logout).
    pub fn reset(&self) {
        self.replies.shutdown();
        self.store.clear();
        self.advisor.clear();
    }

    fn schedule_reply(&self, session_id: Uuid) {
        let handle = self.replies.schedule(session_id);
        let advisor = Arc::clone(&self.advisor);
        tokio::spawn(async move {
            // Re-run the advisor only if the reply actually landed.
            if let Ok(Some(_)) = handle.await {
                advisor.spawn_review(session_id);
            }
        });
    }
}
