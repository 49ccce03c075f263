//! Session domain model.
//!
//! A session is one chat thread: a title, an append-only message log and
//! the timestamps of its creation and last change.

use super::message::{Message, Sender};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to every freshly created session.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// Prefix of every generated session id.
pub const SESSION_ID_PREFIX: &str = "chat_";

const PREVIEW_CHARS: usize = 48;

/// Represents one chat session.
///
/// Field names are serialized in camelCase so that histories written by the
/// browser widget (`createdAt`, `updatedAt`) load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier (`chat_<uuid>`)
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Messages in insertion (and display) order
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last append, never earlier than `created_at`
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Creates an empty session stamped with `now`.
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a message and refreshes `updated_at`.
    ///
    /// A clock that went backwards never moves `updated_at` back.
    pub fn push(&mut self, content: impl Into<String>, sender: Sender, now: DateTime<Utc>) -> &Message {
        let stamp = now.max(self.updated_at);
        self.messages.push(Message::new(content, sender, stamp));
        self.updated_at = stamp;
        &self.messages[self.messages.len() - 1]
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Builds the listing view of this session.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            message_count: self.messages.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            preview: self.last_message().map(|m| preview_of(&m.content)),
        }
    }
}

/// Lightweight view of a session for list UIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Start of the last message, if any
    pub preview: Option<String>,
}

/// Generates a new session id.
///
/// UUID v7 keeps ids time-ordered like the millisecond ids the widget used,
/// without colliding when two chats are created in the same millisecond.
pub fn new_session_id() -> String {
    format!("{}{}", SESSION_ID_PREFIX, Uuid::now_v7().simple())
}

fn preview_of(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}
