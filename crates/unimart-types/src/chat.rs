//! Chat session and message types for Unimart.
//!
//! Sessions model a negotiation thread tied to exactly one listing and
//! one counterpart. Messages are immutable once created; a session's
//! message sequence only ever grows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::safety::SafetyVerdict;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The local user.
    #[serde(rename = "self")]
    Own,
    /// The other party in the negotiation.
    Counterpart,
    /// Marketplace-generated notices (e.g., the seed message).
    System,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::Own => write!(f, "self"),
            Sender::Counterpart => write!(f, "counterpart"),
            Sender::System => write!(f, "system"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "self" => Ok(Sender::Own),
            "counterpart" => Ok(Sender::Counterpart),
            "system" => Ok(Sender::System),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A single message within a chat session.
///
/// Messages are immutable once created and ordered by `timestamp`
/// within a session. Fields are read via accessors; there are no
/// mutators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    id: Uuid,
    sender: Sender,
    text: String,
    timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message with a fresh time-sortable id.
    ///
    /// Callers are expected to have validated `text` as non-empty;
    /// the session store does this before constructing a message.
    pub fn new(sender: Sender, text: String) -> Self {
        Message {
            id: Uuid::now_v7(),
            sender,
            text,
            timestamp: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A chat thread between the local user and one counterpart, tied to
/// one listing.
///
/// `listing_id` is a weak reference: the catalog may delete the listing
/// without invalidating the chat history. `verdict` is the last
/// advisory result from the safety advisor and is updated independently
/// of message appends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub listing_title: String,
    pub counterpart_name: String,
    pub messages: Vec<Message>,
    pub verdict: SafetyVerdict,
}

impl ChatSession {
    /// Create a session seeded with one system message announcing the
    /// listing's availability.
    pub fn new(listing_id: Uuid, listing_title: String, counterpart_name: String) -> Self {
        let seed = Message::new(
            Sender::System,
            format!("Hi! Is this item ({listing_title}) still available?"),
        );

        ChatSession {
            id: Uuid::now_v7(),
            listing_id,
            listing_title,
            counterpart_name,
            messages: vec![seed],
            verdict: SafetyVerdict::default(),
        }
    }

    /// The text of the newest `n` messages, oldest first.
    pub fn recent_texts(&self, n: usize) -> Vec<String> {
        let start = self.messages.len().saturating_sub(n);
        self.messages[start..]
            .iter()
            .map(|m| m.text().to_string())
            .collect()
    }
}
