//! Error types for Zwen AI.

use thiserror::Error;

/// Errors raised by a key-value persistence backend.
///
/// None of these are fatal: callers log them and keep the in-memory
/// state as the source of truth.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The backend cannot be reached at all (no directory, permissions, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Writing would exceed the configured storage quota
    #[error("Storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded { needed: usize, limit: usize },

    /// Persisted data exists but cannot be parsed
    #[error("Corrupt persisted data: {0}")]
    Corrupt(String),

    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(String),
}

impl PersistenceError {
    /// Creates an Unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates a Corrupt error
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt(message.into())
    }

    /// Check if this is a quota error
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }

    /// Check if this is a corrupt-data error
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt(_))
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Corrupt(err.to_string())
    }
}

/// A shared error type for the whole application.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZwenError {
    /// Persistence layer failure
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Attachment rejected because of its size
    #[error("File size too large: {size} bytes (maximum is {limit} bytes)")]
    AttachmentTooLarge { size: u64, limit: u64 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ZwenError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<toml::de::Error> for ZwenError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for ZwenError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence(err.into())
    }
}

/// A type alias for `Result<T, ZwenError>`.
pub type Result<T> = std::result::Result<T, ZwenError>;
