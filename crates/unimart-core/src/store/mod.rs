//! In-memory session store.
//!
//! Maintains the mapping from listing to chat session and the
//! append-only message log per session. All mutation goes through
//! [`SessionStore::start_or_get`] and [`SessionStore::append`]; the
//! per-entry lock on the session map serializes concurrent appends so
//! the log can never interleave into a corrupted sequence.
//!
//! State lives for the lifetime of the owning process only. There is no
//! persistence; [`SessionStore::clear`] models logout.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};
use uuid::Uuid;

use unimart_types::chat::{ChatSession, Message, Sender};
use unimart_types::error::ChatError;
use unimart_types::listing::ListingRef;
use unimart_types::safety::SafetyVerdict;

/// Holds every chat session, keyed by session id, with a secondary
/// index from listing id to session id.
///
/// Exactly one session exists per listing: starting a chat on a listing
/// that already has a session reuses it.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, ChatSession>,
    by_listing: DashMap<Uuid, Uuid>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session for `listing`, creating it on first contact.
    ///
    /// A new session is seeded with one system message announcing the
    /// listing's availability. Calling this again for the same listing
    /// returns the existing id unchanged and adds no second seed.
    pub fn start_or_get(&self, listing: &ListingRef) -> Uuid {
        match self.by_listing.entry(listing.id) {
            Entry::Occupied(occupied) => *occupied.get(),
            Entry::Vacant(vacant) => {
                let session = ChatSession::new(
                    listing.id,
                    listing.title.clone(),
                    listing.counterpart_name.clone(),
                );
                let session_id = session.id;
                self.sessions.insert(session_id, session);
                vacant.insert(session_id);
                info!(session_id = %session_id, listing_id = %listing.id, "Chat session started");
                session_id
            }
        }
    }

    /// Append a message to a session's log.
    ///
    /// Trims `text` and rejects empty input before touching the log.
    /// The entry lock held during the push is the single-writer path
    /// for the session.
    pub fn append(
        &self,
        session_id: Uuid,
        sender: Sender,
        text: &str,
    ) -> Result<Message, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let mut session = self
            .sessions
            .get_mut(&session_id)
            .ok_or(ChatError::SessionNotFound(session_id))?;

        let message = Message::new(sender, text.to_string());
        session.messages.push(message.clone());
        debug!(
            session_id = %session_id,
            sender = %sender,
            message_count = session.messages.len(),
            "Message appended"
        );
        Ok(message)
    }

    /// Snapshot of one session, if it exists.
    pub fn session(&self, session_id: &Uuid) -> Option<ChatSession> {
        self.sessions.get(session_id).map(|s| s.clone())
    }

    /// Snapshot of all sessions, for the session list view.
    pub fn sessions(&self) -> Vec<ChatSession> {
        self.sessions.iter().map(|s| s.clone()).collect()
    }

    /// The text of the newest `n` messages in a session, oldest first.
    pub fn recent_texts(&self, session_id: &Uuid, n: usize) -> Result<Vec<String>, ChatError> {
        self.sessions
            .get(session_id)
            .map(|s| s.recent_texts(n))
            .ok_or(ChatError::SessionNotFound(*session_id))
    }

    /// Replace a session's advisory verdict.
    ///
    /// Called only by the safety advisor; does not touch the message
    /// log.
    pub fn set_verdict(
        &self,
        session_id: Uuid,
        verdict: SafetyVerdict,
    ) -> Result<(), ChatError> {
        let mut session = self
            .sessions
            .get_mut(&session_id)
            .ok_or(ChatError::SessionNotFound(session_id))?;
        session.verdict = verdict;
        Ok(())
    }

    /// The current advisory verdict for a session.
    pub fn verdict(&self, session_id: &Uuid) -> Result<SafetyVerdict, ChatError> {
        self.sessions
            .get(session_id)
            .map(|s| s.verdict.clone())
            .ok_or(ChatError::SessionNotFound(*session_id))
    }

    /// Drop all sessions (logout).
    pub fn clear(&self) {
        let count = self.sessions.len();
        self.sessions.clear();
        self.by_listing.clear();
        info!(session_count = count, "Session store cleared");
    }
}
