//! Recording asset loader.

use std::sync::{Arc, Mutex};

use underpass_core::loader::{AssetLoader, LoadRequest};

/// An asset loader that records requests and never completes them on its
/// own. Tests feed outcomes back to the runtime in whatever order they need.
#[derive(Debug, Clone, Default)]
pub struct RecordingAssetLoader {
    requests: Arc<Mutex<Vec<LoadRequest>>>,
}

impl RecordingAssetLoader {
    /// Create an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every request issued so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<LoadRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl AssetLoader for RecordingAssetLoader {
    fn begin_load(&mut self, request: LoadRequest) {
        self.requests.lock().unwrap().push(request);
    }
}
