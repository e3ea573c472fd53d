//! Recording boundary sink.

use std::sync::{Arc, Mutex};

use underpass_core::message::{MessageSink, Outbound};

/// A message sink that records every outbound message. Clones share the same
/// recording, so a test can keep one clone while the runtime owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    sent: Arc<Mutex<Vec<Outbound>>>,
}

impl RecordingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every message sent so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn sent(&self) -> Vec<Outbound> {
        self.sent.lock().unwrap().clone()
    }

    /// Removes and returns every message sent so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn take(&self) -> Vec<Outbound> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

impl MessageSink for RecordingSink {
    fn send(&mut self, message: Outbound) {
        self.sent.lock().unwrap().push(message);
    }
}
