//! Persisted save record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key prefix reserved for save slots.
pub const SAVE_KEY_PREFIX: &str = "persist-";

/// Storage key for `slot`.
#[must_use]
pub fn storage_key(slot: &str) -> String {
    format!("{SAVE_KEY_PREFIX}{slot}")
}

/// Slot name for a storage key, if the key belongs to a save slot.
#[must_use]
pub fn slot_name(storage_key: &str) -> Option<&str> {
    storage_key.strip_prefix(SAVE_KEY_PREFIX)
}

/// What a slot holds: when it was written and the game history, passed
/// through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Write time, epoch milliseconds.
    pub timestamp: i64,
    /// Opaque game-state entries.
    pub history: Vec<Value>,
}

impl SaveRecord {
    /// A record written at `now`.
    #[must_use]
    pub fn new(history: Vec<Value>, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now.timestamp_millis(),
            history,
        }
    }

    /// Parses a stored value. Anything malformed yields `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}
