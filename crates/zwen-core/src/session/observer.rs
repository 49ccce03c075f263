//! Outbound notifications from the session store.

use super::message::Message;
use super::model::SessionSummary;

/// Receives store changes so a presentation layer can re-render.
///
/// Callbacks run synchronously inside the mutating store call and must not
/// call back into the store.
pub trait SessionObserver: Send + Sync {
    /// A message was appended to `session_id`.
    fn on_message_appended(&self, session_id: &str, message: &Message);

    /// The session list (order, titles, counts or active session) changed.
    fn on_session_list_changed(&self, sessions: &[SessionSummary]);
}
