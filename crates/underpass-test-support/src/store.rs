//! Test stores — `KeyValueStore` implementations for error paths.

use underpass_core::error::RuntimeError;
use underpass_core::store::KeyValueStore;

/// A store whose every operation fails, like a browser with storage disabled
/// or over quota.
#[derive(Debug)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, RuntimeError> {
        Err(RuntimeError::Storage("quota exceeded".into()))
    }

    fn set(&mut self, _key: &str, _value: String) -> Result<(), RuntimeError> {
        Err(RuntimeError::Storage("quota exceeded".into()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), RuntimeError> {
        Err(RuntimeError::Storage("quota exceeded".into()))
    }

    fn entries_with_prefix(&self, _prefix: &str) -> Result<Vec<(String, String)>, RuntimeError> {
        Err(RuntimeError::Storage("quota exceeded".into()))
    }
}
