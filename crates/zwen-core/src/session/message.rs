//! Chat message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message.
///
/// The assistant is stored as `"ai"`, the form chat histories have always
/// been written in; `"assistant"` is accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sender {
    /// Message typed by the user.
    #[serde(rename = "user")]
    User,
    /// Message produced by Zwen AI.
    #[serde(rename = "ai", alias = "assistant")]
    Assistant,
}

impl Sender {
    /// Label used when rendering a transcript.
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Assistant => "Zwen AI",
        }
    }
}

/// A single turn in a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The text of the message.
    pub content: String,
    /// The author of the message.
    pub sender: Sender,
    /// When the message was appended.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(content: impl Into<String>, sender: Sender, timestamp: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            sender,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_wire_names() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Sender::Assistant).unwrap(), "\"ai\"");
        let parsed: Sender = serde_json::from_str("\"assistant\"").unwrap();
        assert_eq!(parsed, Sender::Assistant);
    }

    #[test]
    fn test_reads_browser_timestamp() {
        let json = r#"{"content":"hi","sender":"user","timestamp":"2024-05-01T10:20:30.123Z"}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.content, "hi");
        assert_eq!(message.sender, Sender::User);
        assert_eq!(message.timestamp.timestamp_subsec_millis(), 123);
    }
}
