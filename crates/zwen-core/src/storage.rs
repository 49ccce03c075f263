//! Key-value persistence interface.
//!
//! Defines the contract the session store persists through. It mirrors a
//! browser's local storage: string keys, string values, synchronous calls.

use crate::error::PersistenceError;

/// A string key-value store used for best-effort persistence.
///
/// Implementations should handle:
/// - Missing keys (return `Ok(None)`, never an error)
/// - Quotas, reported as `PersistenceError::QuotaExceeded`
/// - Concurrent access from multiple handles if they share a backend
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: Key present
    /// - `Ok(None)`: Key absent
    /// - `Err(_)`: The backend could not be read
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Removes `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Total size a set of entries occupies against a quota.
pub fn entries_size<'a, I>(entries: I) -> usize
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    entries.into_iter().map(|(k, v)| k.len() + v.len()).sum()
}
