use super::message::{Message, Sender};
use super::model::{Session, SessionSummary, new_session_id};
use super::observer::SessionObserver;
use crate::config::StorageConfig;
use crate::error::PersistenceError;
use crate::storage::KeyValueStore;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

/// What a browser wrote for an unset active id.
const NULL_ACTIVE_ID: &str = "null";

/// Owns every chat session and the active-session pointer.
///
/// `SessionStore` is responsible for:
/// - Creating sessions (newest first) and selecting the active one
/// - Appending messages to any session
/// - Persisting the whole state after every mutation
/// - Restoring state on startup, falling back to an empty store
///
/// Persistence is best-effort: a failed write is logged and the in-memory
/// state stays authoritative for the lifetime of the process.
pub struct SessionStore {
    /// Sessions, most recently created first
    sessions: Vec<Session>,
    /// Always references an entry of `sessions` when set
    active_session_id: Option<String>,
    /// Persistence backend
    backend: Arc<dyn KeyValueStore>,
    /// Key names and quota settings
    config: StorageConfig,
    /// Outbound notification targets
    observers: Vec<Arc<dyn SessionObserver>>,
}

impl SessionStore {
    /// Creates an empty store. Call [`restore`](Self::restore) to load
    /// persisted state.
    pub fn new(backend: Arc<dyn KeyValueStore>, config: StorageConfig) -> Self {
        Self {
            sessions: Vec::new(),
            active_session_id: None,
            backend,
            config,
            observers: Vec::new(),
        }
    }

    /// Registers an observer for store changes.
    pub fn subscribe(&mut self, observer: Arc<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Creates a new session at the front of the list and makes it active.
    ///
    /// `initial` marks the session opened at startup. For any other session
    /// the caller is expected to seed a greeting with
    /// [`append_message`](Self::append_message).
    pub fn create_session(&mut self, initial: bool) -> Session {
        let id = self.fresh_id();
        let session = Session::new(id, Utc::now());

        self.sessions.insert(0, session.clone());
        self.active_session_id = Some(session.id.clone());

        tracing::info!(session_id = %session.id, initial, "Created chat session");

        self.persist_best_effort();
        self.notify_list_changed();
        session
    }

    /// Appends a message to `session_id`.
    ///
    /// An unknown session id is a no-op and returns `None`; the store is left
    /// untouched.
    pub fn append_message(
        &mut self,
        session_id: &str,
        content: impl Into<String>,
        sender: Sender,
    ) -> Option<Message> {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) else {
            tracing::debug!(session_id, "Ignoring message for unknown session");
            return None;
        };

        let message = session.push(content, sender, Utc::now()).clone();
        tracing::debug!(
            session_id,
            sender = ?message.sender,
            count = session.messages.len(),
            "Appended message"
        );

        self.persist_best_effort();
        for observer in &self.observers {
            observer.on_message_appended(session_id, &message);
        }
        self.notify_list_changed();
        Some(message)
    }

    /// Makes `session_id` the active session.
    ///
    /// Returns `false` (and changes nothing) when the id is unknown.
    pub fn select_session(&mut self, session_id: &str) -> bool {
        if self.get_session(session_id).is_none() {
            tracing::debug!(session_id, "Ignoring selection of unknown session");
            return false;
        }
        if self.active_session_id.as_deref() == Some(session_id) {
            return true;
        }

        self.active_session_id = Some(session_id.to_string());
        tracing::info!(session_id, "Switched active session");

        self.persist_best_effort();
        self.notify_list_changed();
        true
    }

    /// Returns the active session, if any.
    pub fn get_active_session(&self) -> Option<&Session> {
        self.active_session_id
            .as_deref()
            .and_then(|id| self.get_session(id))
    }

    pub fn active_session_id(&self) -> Option<&str> {
        self.active_session_id.as_deref()
    }

    pub fn get_session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    /// Lists sessions in store order (most recently created first).
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        self.sessions.iter().map(Session::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Writes the full state to the backend.
    ///
    /// The active id key is removed when no session is active.
    pub fn persist(&self) -> Result<(), PersistenceError> {
        let sessions_json = serde_json::to_string(&self.sessions)?;
        self.backend.set(&self.config.sessions_key, &sessions_json)?;

        match &self.active_session_id {
            Some(id) => self.backend.set(&self.config.active_session_key, id),
            None => self.backend.remove(&self.config.active_session_key),
        }
    }

    /// Replaces the in-memory state with what the backend holds.
    ///
    /// Absent keys give an empty store. Unreadable or malformed data also
    /// gives an empty store, and the error is returned for diagnostics.
    pub fn restore(&mut self) -> Result<(), PersistenceError> {
        let result = self.read_persisted();
        match result {
            Ok((sessions, active_session_id)) => {
                tracing::info!(
                    sessions = sessions.len(),
                    active = ?active_session_id,
                    "Restored chat sessions"
                );
                self.sessions = sessions;
                self.active_session_id = active_session_id;
                self.notify_list_changed();
                Ok(())
            }
            Err(e) => {
                self.sessions.clear();
                self.active_session_id = None;
                self.notify_list_changed();
                Err(e)
            }
        }
    }

    fn read_persisted(&self) -> Result<(Vec<Session>, Option<String>), PersistenceError> {
        let sessions = match self.backend.get(&self.config.sessions_key)? {
            Some(raw) if !raw.trim().is_empty() => {
                serde_json::from_str::<Option<Vec<Session>>>(&raw)?.unwrap_or_default()
            }
            _ => Vec::new(),
        };
        let sessions = dedup_by_id(sessions);

        let active_session_id = self
            .backend
            .get(&self.config.active_session_key)?
            .filter(|id| !id.is_empty() && id != NULL_ACTIVE_ID)
            .filter(|id| {
                let known = sessions.iter().any(|s| &s.id == id);
                if !known {
                    tracing::warn!(session_id = %id, "Dropping active id of a missing session");
                }
                known
            });

        Ok((sessions, active_session_id))
    }

    fn persist_best_effort(&self) {
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "Could not save chat sessions");
        }
    }

    fn notify_list_changed(&self) {
        if self.observers.is_empty() {
            return;
        }
        let summaries = self.list_sessions();
        for observer in &self.observers {
            observer.on_session_list_changed(&summaries);
        }
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = new_session_id();
            if self.get_session(&id).is_none() {
                return id;
            }
        }
    }
}

/// Keeps the first session of every id.
fn dedup_by_id(sessions: Vec<Session>) -> Vec<Session> {
    let mut seen = HashSet::new();
    sessions
        .into_iter()
        .filter(|s| {
            let fresh = seen.insert(s.id.clone());
            if !fresh {
                tracing::warn!(session_id = %s.id, "Dropping duplicate persisted session");
            }
            fresh
        })
        .collect()
}
