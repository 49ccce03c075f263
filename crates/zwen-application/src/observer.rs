//! Forwards store notifications over a channel.

use tokio::sync::mpsc;
use zwen_core::session::{Message, SessionObserver, SessionSummary};

/// Store change sent to a presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    MessageAppended {
        session_id: String,
        message: Message,
    },
    SessionListChanged(Vec<SessionSummary>),
}

/// A `SessionObserver` that sends every notification to an mpsc channel.
pub struct ChannelObserver {
    sender: mpsc::UnboundedSender<StoreEvent>,
}

impl ChannelObserver {
    /// Create a new observer with the given channel sender
    pub fn new(sender: mpsc::UnboundedSender<StoreEvent>) -> Self {
        Self { sender }
    }

    /// Create an observer together with the receiving end of its channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StoreEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl SessionObserver for ChannelObserver {
    fn on_message_appended(&self, session_id: &str, message: &Message) {
        // A dropped receiver just means nobody is rendering any more
        let _ = self.sender.send(StoreEvent::MessageAppended {
            session_id: session_id.to_string(),
            message: message.clone(),
        });
    }

    fn on_session_list_changed(&self, sessions: &[SessionSummary]) {
        let _ = self
            .sender
            .send(StoreEvent::SessionListChanged(sessions.to_vec()));
    }
}
