//! Shared test helpers for runtime integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::TimeDelta;
use underpass_assets::domain::manifest::GameManifest;
use underpass_core::clock::Clock;
use underpass_core::loader::{LoadFailure, LoadOutcome, LoadedAsset};
use underpass_core::store::KeyValueStore;
use underpass_persist::infrastructure::memory_store::MemoryStore;
use underpass_runtime::runtime::{Runtime, RuntimePorts};
use underpass_test_support::{
    ManualClock, RecordingAssetLoader, RecordingAudioBackend, RecordingSink,
};

/// Two blocking images, one blocking sound, and two loops: `platform` with a
/// configured length and `tunnel` whose length comes from its decoded base.
pub const MANIFEST: &str = r"
images:
  - { path: title.png }
  - { path: platform/bench.png }
sounds:
  - { key: song, exts: [mp3, ogg] }
  - { key: piano2, exts: [mp3], blocking: true }
  - { key: song_long, exts: [mp3] }
  - { key: subway_ambient_loop, exts: [wav], loop: true, volume: 0.6 }
  - { key: subway_whistle, exts: [wav] }
loops:
  - { key: platform, base: song, drama: piano2, length_ms: 4000 }
  - { key: tunnel, base: song_long }
";

/// A runtime wired to recording doubles on a manual clock.
pub struct Harness {
    pub runtime: Runtime,
    pub clock: Arc<ManualClock>,
    pub audio: RecordingAudioBackend,
    pub loader: RecordingAssetLoader,
    pub sink: RecordingSink,
}

/// Build and start a runtime for `manifest` backed by an in-memory store.
pub fn start(manifest: &str) -> Harness {
    start_with_store(manifest, Box::new(MemoryStore::new()))
}

/// Build and start a runtime for `manifest` backed by `store`.
pub fn start_with_store(manifest: &str, store: Box<dyn KeyValueStore>) -> Harness {
    let manifest = GameManifest::from_yaml(manifest).unwrap();
    let catalog = manifest.to_catalog(&[]).unwrap();
    let clock = Arc::new(ManualClock::at_epoch());
    let audio = RecordingAudioBackend::new();
    let loader = RecordingAssetLoader::new();
    let sink = RecordingSink::new();

    let shared_clock: Arc<dyn Clock> = clock.clone();
    let ports = RuntimePorts {
        clock: shared_clock,
        loader: Box::new(loader.clone()),
        audio: Box::new(audio.clone()),
        store,
        sink: Box::new(sink.clone()),
    };
    let mut runtime = Runtime::new(catalog, manifest.timings, ports);
    runtime.start();

    Harness {
        runtime,
        clock,
        audio,
        loader,
        sink,
    }
}

impl Harness {
    /// Advance the clock by `ms` and run one display frame.
    pub fn frame(&mut self, ms: i64) {
        self.clock.advance_ms(ms);
        self.runtime.tick();
    }

    /// Run frames of `step` ms until `total` ms have passed.
    pub fn run_for(&mut self, total: i64, step: i64) {
        let mut elapsed = 0;
        while elapsed < total {
            self.frame(step);
            elapsed += step;
        }
    }

    /// Report `key` as loaded with an optional decoded duration.
    pub fn complete(&mut self, key: &str, duration: Option<TimeDelta>) {
        self.runtime.on_asset_loaded(&LoadOutcome {
            key: key.to_owned(),
            result: Ok(LoadedAsset {
                source: format!("{key}.src"),
                duration,
            }),
        });
    }

    /// Report `key` as missing.
    pub fn fail(&mut self, key: &str) {
        self.runtime.on_asset_loaded(&LoadOutcome {
            key: key.to_owned(),
            result: Err(LoadFailure::NotFound(vec![format!("{key}.src")])),
        });
    }
}
