//! Configuration model.
//!
//! Every field has a default, so an empty or partial `config.toml` is valid.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SESSIONS_KEY: &str = "zwenAI_chats";
pub const DEFAULT_ACTIVE_SESSION_KEY: &str = "zwenAI_currentChatId";
pub const DEFAULT_GREETING: &str = "Hello! I'm Zwen AI! How can I help you today? 😊";
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ZwenConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl ZwenConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> crate::error::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Where and how the session store persists.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Key holding the JSON array of sessions
    pub sessions_key: String,
    /// Key holding the active session id
    pub active_session_key: String,
    /// Optional storage quota in bytes
    pub quota_bytes: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sessions_key: DEFAULT_SESSIONS_KEY.to_string(),
            active_session_key: DEFAULT_ACTIVE_SESSION_KEY.to_string(),
            quota_bytes: None,
        }
    }
}

/// Chat behaviour: greeting and simulated latencies.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    pub greeting: String,
    pub reply_delay_min_ms: u64,
    pub reply_delay_max_ms: u64,
    pub upload_delay_ms: u64,
    pub upload_ack_delay_ms: u64,
    pub max_attachment_bytes: u64,
    /// Open a fresh chat on every startup, even when history exists
    pub start_with_new_chat: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            reply_delay_min_ms: 1000,
            reply_delay_max_ms: 2000,
            upload_delay_ms: 1500,
            upload_ack_delay_ms: 500,
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            start_with_new_chat: false,
        }
    }
}

impl ChatConfig {
    /// Config with every simulated delay set to zero.
    pub fn instant() -> Self {
        Self {
            reply_delay_min_ms: 0,
            reply_delay_max_ms: 0,
            upload_delay_ms: 0,
            upload_ack_delay_ms: 0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = ZwenConfig::from_toml_str("").unwrap();
        assert_eq!(config, ZwenConfig::default());
        assert_eq!(config.storage.sessions_key, "zwenAI_chats");
        assert_eq!(config.chat.max_attachment_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_partial_document() {
        let config = ZwenConfig::from_toml_str(
            r#"
            [storage]
            quota_bytes = 1024

            [chat]
            reply_delay_min_ms = 10
            start_with_new_chat = true
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.quota_bytes, Some(1024));
        assert_eq!(config.storage.active_session_key, DEFAULT_ACTIVE_SESSION_KEY);
        assert_eq!(config.chat.reply_delay_min_ms, 10);
        assert_eq!(config.chat.reply_delay_max_ms, 2000);
        assert!(config.chat.start_with_new_chat);
    }

    #[test]
    fn test_malformed_document_is_config_error() {
        let err = ZwenConfig::from_toml_str("[chat\ngreeting = 1").unwrap_err();
        assert!(matches!(err, crate::error::ZwenError::Config(_)));
    }
}
