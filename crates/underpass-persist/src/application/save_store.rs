//! Save slot operations over a key-value store.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};
use underpass_core::error::RuntimeError;
use underpass_core::store::KeyValueStore;

use crate::domain::record::{SAVE_KEY_PREFIX, SaveRecord, slot_name, storage_key};

/// Response to a slot listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotListing {
    /// When the listing was taken, formatted as an HTTP date in UTC.
    pub requested_at: String,
    /// Slot names, most recently written first.
    pub slots: Vec<String>,
}

/// Formats `now` the way HTTP dates are written, e.g.
/// `Thu, 15 Jan 2026 10:00:00 GMT`.
#[must_use]
pub fn http_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Named save slots.
pub struct SaveStore {
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for SaveStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveStore").finish_non_exhaustive()
    }
}

impl SaveStore {
    /// Wraps `store`.
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Lists slots, newest first. Slots whose record is malformed sort last;
    /// equal timestamps order by name. A store that cannot be read lists as
    /// empty.
    #[must_use]
    pub fn list(&self, now: DateTime<Utc>) -> SlotListing {
        let entries = self
            .store
            .entries_with_prefix(SAVE_KEY_PREFIX)
            .unwrap_or_else(|e| {
                warn!(error = %e, "save slots unreadable; listing none");
                Vec::new()
            });

        let mut slots: Vec<(Option<i64>, String)> = entries
            .iter()
            .filter_map(|(key, raw)| {
                let slot = slot_name(key)?;
                Some((SaveRecord::parse(raw).map(|r| r.timestamp), slot.to_owned()))
            })
            .collect();
        slots.sort_by(|(ta, na), (tb, nb)| Reverse(*ta).cmp(&Reverse(*tb)).then_with(|| na.cmp(nb)));

        debug!(count = slots.len(), "listed save slots");
        SlotListing {
            requested_at: http_date(now),
            slots: slots.into_iter().map(|(_, slot)| slot).collect(),
        }
    }

    /// History stored in `slot`; empty when the slot is absent, malformed or
    /// unreadable.
    #[must_use]
    pub fn load(&self, slot: &str) -> Vec<Value> {
        match self.store.get(&storage_key(slot)) {
            Ok(Some(raw)) => SaveRecord::parse(&raw).map_or_else(
                || {
                    warn!(slot, "save slot malformed; loading empty history");
                    Vec::new()
                },
                |record| record.history,
            ),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(slot, error = %e, "save slot unreadable; loading empty history");
                Vec::new()
            }
        }
    }

    /// Writes `history` to `slot` stamped with `now`, replacing any previous
    /// record.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Storage` if the record cannot be encoded or the
    /// store rejects the write.
    pub fn save(
        &mut self,
        slot: &str,
        history: Vec<Value>,
        now: DateTime<Utc>,
    ) -> Result<(), RuntimeError> {
        let record = SaveRecord::new(history, now);
        let raw = serde_json::to_string(&record)
            .map_err(|e| RuntimeError::Storage(format!("save encoding failed: {e}")))?;
        self.store.set(&storage_key(slot), raw)?;
        info!(slot, entries = record.history.len(), "game saved");
        Ok(())
    }

    /// Removes `slot`.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Storage` if the store rejects the removal.
    pub fn delete(&mut self, slot: &str) -> Result<(), RuntimeError> {
        self.store.remove(&storage_key(slot))?;
        info!(slot, "save deleted");
        Ok(())
    }
}
