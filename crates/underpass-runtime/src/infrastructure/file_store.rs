//! JSON-file implementation of the `KeyValueStore` trait.
//!
//! The whole store is one JSON object. Every write rewrites the file through
//! a temporary sibling and a rename, so a crash never leaves half a file.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};
use underpass_core::error::RuntimeError;
use underpass_core::store::KeyValueStore;

use crate::error::AppError;

/// File-backed key-value store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store; a file
    /// that is not a JSON object of strings is logged and treated as empty.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "save file malformed; starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), entries = entries.len(), "save file opened");
        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<(), RuntimeError> {
        let text = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| RuntimeError::Storage(format!("save file encoding failed: {e}")))?;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, text)
            .and_then(|()| fs::rename(&staging, &self.path))
            .map_err(|e| {
                RuntimeError::Storage(format!("failed to write {}: {e}", self.path.display()))
            })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, RuntimeError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), RuntimeError> {
        let previous = self.entries.insert(key.to_owned(), value);
        if let Err(e) = self.flush() {
            match previous {
                Some(old) => self.entries.insert(key.to_owned(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), RuntimeError> {
        let Some(previous) = self.entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.flush() {
            self.entries.insert(key.to_owned(), previous);
            return Err(e);
        }
        Ok(())
    }

    fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, RuntimeError> {
        Ok(self
            .entries
            .range(prefix.to_owned()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}
