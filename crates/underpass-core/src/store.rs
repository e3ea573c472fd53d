//! Key-value store abstraction.
//!
//! Mirrors the browser's local storage: string keys, string values, no
//! transactions.

use crate::error::RuntimeError;

/// Persistent string key-value store.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Storage` if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, RuntimeError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Storage` if the write is rejected.
    fn set(&mut self, key: &str, value: String) -> Result<(), RuntimeError>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Storage` if the write is rejected.
    fn remove(&mut self, key: &str) -> Result<(), RuntimeError>;

    /// Returns every `(key, value)` pair whose key starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Storage` if the backing store cannot be read.
    fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, RuntimeError>;
}
