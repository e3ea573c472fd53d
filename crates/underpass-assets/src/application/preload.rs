//! Preload handlers.
//!
//! `begin_load_all` runs once at startup; `handle_load_outcome` runs for each
//! completion the loader reports, in whatever order they arrive.

use tracing::{debug, info, warn};
use underpass_core::loader::{AssetKind, AssetLoader, LoadOutcome, LoadRequest};
use underpass_core::message::{MessageSink, Outbound};

use crate::domain::barrier::{CompletionEffect, PreloadBarrier};
use crate::domain::catalog::AssetCatalog;
use crate::domain::sound_bank::SoundBank;

/// Registers every catalog asset with the barrier, creates the sound handles,
/// and issues one load request per asset.
///
/// When the catalog has no blocking assets the `loaded` message is sent
/// before any request is issued.
pub fn begin_load_all(
    catalog: &AssetCatalog,
    barrier: &mut PreloadBarrier,
    bank: &mut SoundBank,
    loader: &mut dyn AssetLoader,
    sink: &mut dyn MessageSink,
) {
    for descriptor in catalog.assets() {
        barrier.register(descriptor);
        if descriptor.kind == AssetKind::Sound {
            bank.insert(descriptor);
        }
    }

    info!(
        total = catalog.assets().len(),
        blocking = barrier.counter().required(),
        "preloading assets"
    );

    if barrier.seal() {
        info!("no blocking assets declared; ready immediately");
        sink.send(Outbound::Loaded(true));
    }

    for descriptor in catalog.assets() {
        debug!(key = %descriptor.key, kind = ?descriptor.kind, "loading asset");
        loader.begin_load(LoadRequest {
            key: descriptor.key.clone(),
            kind: descriptor.kind,
            sources: descriptor.sources(),
        });
    }
}

/// Applies one load outcome. Failures are logged and counted as completions
/// so a missing file cannot hold the game at the loading screen; the failed
/// sound's handle is marked unusable.
pub fn handle_load_outcome(
    outcome: &LoadOutcome,
    barrier: &mut PreloadBarrier,
    bank: &mut SoundBank,
    sink: &mut dyn MessageSink,
) {
    match &outcome.result {
        Ok(loaded) => {
            debug!(key = %outcome.key, source = %loaded.source, "asset loaded");
            bank.mark_ready(&outcome.key, loaded.duration);
        }
        Err(failure) => {
            warn!(key = %outcome.key, error = %failure, "asset failed to load; counting it as complete");
            bank.mark_failed(&outcome.key);
        }
    }

    match barrier.on_asset_complete(&outcome.key) {
        CompletionEffect::Ignored => {}
        CompletionEffect::Progress {
            completed,
            required,
        } => {
            debug!(completed, required, "preload progress");
            sink.send(Outbound::LoadProgress {
                completed,
                required,
            });
        }
        CompletionEffect::Ready { required } => {
            sink.send(Outbound::LoadProgress {
                completed: required,
                required,
            });
            info!(required, "all assets loaded");
            sink.send(Outbound::Loaded(true));
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use underpass_core::loader::{LoadFailure, LoadedAsset};
    use underpass_test_support::{RecordingAssetLoader, RecordingSink};

    use super::*;
    use crate::domain::catalog::AssetDescriptor;
    use crate::domain::sound_bank::LoadStatus;

    fn loaded(key: &str) -> LoadOutcome {
        LoadOutcome {
            key: key.to_owned(),
            result: Ok(LoadedAsset {
                source: format!("img/{key}"),
                duration: None,
            }),
        }
    }

    fn failed(key: &str) -> LoadOutcome {
        LoadOutcome {
            key: key.to_owned(),
            result: Err(LoadFailure::NotFound(vec![format!("audio/{key}.wav")])),
        }
    }

    fn scenario_catalog() -> AssetCatalog {
        AssetCatalog::new(
            vec![
                AssetDescriptor::image("train.png"),
                AssetDescriptor::image("platform.png"),
                AssetDescriptor::sound("subway_arrival", ["wav"]),
            ],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_begin_load_all_issues_one_request_per_asset() {
        // Arrange
        let catalog = scenario_catalog();
        let mut barrier = PreloadBarrier::new();
        let mut bank = SoundBank::new();
        let mut loader = RecordingAssetLoader::new();
        let mut sink = RecordingSink::new();

        // Act
        begin_load_all(&catalog, &mut barrier, &mut bank, &mut loader, &mut sink);

        // Assert
        let requests = loader.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].kind, AssetKind::Sound);
        assert_eq!(requests[2].sources, vec!["audio/subway_arrival.wav"]);
        assert_eq!(bank.len(), 1);
        assert!(sink.sent().is_empty());
    }

    #[test]
    fn test_begin_load_all_fires_before_requests_when_nothing_blocks() {
        // Arrange
        let catalog = AssetCatalog::new(
            vec![AssetDescriptor::sound("subway_arrival", ["wav"])],
            vec![],
        )
        .unwrap();
        let mut barrier = PreloadBarrier::new();
        let mut bank = SoundBank::new();
        let mut loader = RecordingAssetLoader::new();
        let mut sink = RecordingSink::new();

        // Act
        begin_load_all(&catalog, &mut barrier, &mut bank, &mut loader, &mut sink);

        // Assert
        assert_eq!(sink.sent(), vec![Outbound::Loaded(true)]);
        assert!(barrier.is_ready());
    }

    #[test]
    fn test_ready_fires_after_both_images_regardless_of_sound() {
        // Arrange
        let catalog = scenario_catalog();
        let mut barrier = PreloadBarrier::new();
        let mut bank = SoundBank::new();
        let mut loader = RecordingAssetLoader::new();
        let mut sink = RecordingSink::new();
        begin_load_all(&catalog, &mut barrier, &mut bank, &mut loader, &mut sink);

        // Act
        handle_load_outcome(&loaded("platform.png"), &mut barrier, &mut bank, &mut sink);
        handle_load_outcome(&loaded("train.png"), &mut barrier, &mut bank, &mut sink);
        handle_load_outcome(&failed("subway_arrival"), &mut barrier, &mut bank, &mut sink);

        // Assert
        assert_eq!(
            sink.sent(),
            vec![
                Outbound::LoadProgress {
                    completed: 1,
                    required: 2
                },
                Outbound::LoadProgress {
                    completed: 2,
                    required: 2
                },
                Outbound::Loaded(true),
            ]
        );
        assert_eq!(
            bank.get("subway_arrival").unwrap().status(),
            LoadStatus::Failed
        );
    }

    #[test]
    fn test_failed_blocking_sound_still_releases_barrier() {
        // Arrange
        let catalog = AssetCatalog::new(
            vec![AssetDescriptor::sound("subway_whistle", ["wav"]).with_blocking(true)],
            vec![],
        )
        .unwrap();
        let mut barrier = PreloadBarrier::new();
        let mut bank = SoundBank::new();
        let mut loader = RecordingAssetLoader::new();
        let mut sink = RecordingSink::new();
        begin_load_all(&catalog, &mut barrier, &mut bank, &mut loader, &mut sink);

        // Act
        handle_load_outcome(&failed("subway_whistle"), &mut barrier, &mut bank, &mut sink);

        // Assert
        assert!(barrier.is_ready());
        assert_eq!(sink.sent().last(), Some(&Outbound::Loaded(true)));
        assert!(!bank.get("subway_whistle").unwrap().is_usable());
    }

    #[test]
    fn test_successful_sound_records_decoded_duration() {
        // Arrange
        let catalog = AssetCatalog::new(
            vec![AssetDescriptor::sound("song", ["mp3"]).with_blocking(true)],
            vec![],
        )
        .unwrap();
        let mut barrier = PreloadBarrier::new();
        let mut bank = SoundBank::new();
        let mut loader = RecordingAssetLoader::new();
        let mut sink = RecordingSink::new();
        begin_load_all(&catalog, &mut barrier, &mut bank, &mut loader, &mut sink);
        let outcome = LoadOutcome {
            key: "song".into(),
            result: Ok(LoadedAsset {
                source: "audio/song.mp3".into(),
                duration: Some(TimeDelta::seconds(9)),
            }),
        };

        // Act
        handle_load_outcome(&outcome, &mut barrier, &mut bank, &mut sink);

        // Assert
        let song = bank.get("song").unwrap();
        assert_eq!(song.status(), LoadStatus::Ready);
        assert_eq!(song.duration(), Some(TimeDelta::seconds(9)));
    }
}
