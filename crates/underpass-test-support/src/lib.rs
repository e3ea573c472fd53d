//! Shared test doubles for the Underpass runtime.

mod audio;
mod clock;
mod loader;
mod sink;
mod store;

pub use audio::{AudioCall, RecordingAudioBackend};
pub use clock::{ManualClock, test_epoch};
pub use loader::RecordingAssetLoader;
pub use sink::RecordingSink;
pub use store::FailingStore;
