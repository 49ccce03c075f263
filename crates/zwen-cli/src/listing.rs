//! Chat list kept current from store notifications.

use std::sync::Arc;

use tokio::sync::Mutex;
use zwen_application::StoreEvent;
use zwen_core::session::{Message, Sender, SessionSummary};

/// The most recent chat listing the store announced.
#[derive(Clone, Default)]
pub struct ChatListing {
    sessions: Arc<Mutex<Vec<SessionSummary>>>,
}

impl ChatListing {
    pub fn new(sessions: Vec<SessionSummary>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(sessions)),
        }
    }

    /// Applies one store event.
    ///
    /// Returns the session id and message when an assistant reply should be shown.
    pub async fn apply(&self, event: StoreEvent) -> Option<(String, Message)> {
        match event {
            StoreEvent::SessionListChanged(sessions) => {
                *self.sessions.lock().await = sessions;
                None
            }
            StoreEvent::MessageAppended {
                session_id,
                message,
            } if message.sender == Sender::Assistant => Some((session_id, message)),
            StoreEvent::MessageAppended { .. } => None,
        }
    }

    pub async fn snapshot(&self) -> Vec<SessionSummary> {
        self.sessions.lock().await.clone()
    }

    pub async fn title_of(&self, session_id: &str) -> Option<String> {
        self.sessions
            .lock()
            .await
            .iter()
            .find(|s| s.id == session_id)
            .map(|s| s.title.clone())
    }

    /// Resolves a 1-based list position or a literal id.
    pub async fn resolve(&self, target: &str) -> Option<String> {
        let sessions = self.sessions.lock().await;
        match target.parse::<usize>() {
            Ok(position) => position
                .checked_sub(1)
                .and_then(|i| sessions.get(i))
                .map(|s| s.id.clone()),
            Err(_) => sessions
                .iter()
                .find(|s| s.id == target)
                .map(|s| s.id.clone()),
        }
    }
}
