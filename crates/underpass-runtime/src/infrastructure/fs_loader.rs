//! Filesystem implementation of the `AssetLoader` trait.
//!
//! Each request runs on its own tokio task. Candidate sources are tried in
//! order; the first that exists wins. WAV files are decoded far enough to
//! learn their duration, which the loop sequencer needs when a loop has no
//! configured length. Outcomes are sent back over a channel in completion
//! order.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};
use underpass_core::loader::{
    AssetKind, AssetLoader, LoadFailure, LoadOutcome, LoadRequest, LoadedAsset,
};

/// Sound extensions whose playback length is read at load time.
pub const DURATION_EXTENSIONS: &[&str] = &["wav"];

/// Loads assets from a directory tree.
#[derive(Debug, Clone)]
pub struct FsAssetLoader {
    root: PathBuf,
    outcomes: UnboundedSender<LoadOutcome>,
}

impl FsAssetLoader {
    /// Creates a loader reading from `root` and reporting to `outcomes`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, outcomes: UnboundedSender<LoadOutcome>) -> Self {
        Self {
            root: root.into(),
            outcomes,
        }
    }
}

impl AssetLoader for FsAssetLoader {
    /// Must be called from within a tokio runtime.
    fn begin_load(&mut self, request: LoadRequest) {
        let root = self.root.clone();
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let result = load_first_available(&root, &request).await;
            if let Err(e) = &result {
                warn!(key = %request.key, error = %e, "asset load failed");
            }
            if outcomes
                .send(LoadOutcome {
                    key: request.key,
                    result,
                })
                .is_err()
            {
                debug!("runtime gone; load outcome discarded");
            }
        });
    }
}

/// Tries each candidate source of `request` under `root` in order.
///
/// # Errors
///
/// Returns `LoadFailure::NotFound` if no candidate exists, and
/// `LoadFailure::Unreadable` if the first existing candidate cannot be read
/// or decoded.
pub async fn load_first_available(
    root: &Path,
    request: &LoadRequest,
) -> Result<LoadedAsset, LoadFailure> {
    for source in &request.sources {
        let path = root.join(source);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let duration = match request.kind {
                    AssetKind::Sound => probe_duration(source, &bytes)?,
                    AssetKind::Image => None,
                };
                debug!(key = %request.key, source = %source, "asset loaded");
                return Ok(LoadedAsset {
                    source: source.clone(),
                    duration,
                });
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(LoadFailure::Unreadable {
                    path: source.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    Err(LoadFailure::NotFound(request.sources.clone()))
}

/// Whether a source with this extension has its duration read at load time.
#[must_use]
pub fn reports_duration(extension: &str) -> bool {
    DURATION_EXTENSIONS
        .iter()
        .any(|known| extension.eq_ignore_ascii_case(known))
}

/// Playback length of a WAV source. Other formats are accepted without a
/// duration.
fn probe_duration(source: &str, bytes: &[u8]) -> Result<Option<TimeDelta>, LoadFailure> {
    let is_wav = Path::new(source)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(reports_duration);
    if !is_wav {
        return Ok(None);
    }

    let reader = hound::WavReader::new(Cursor::new(bytes)).map_err(|e| {
        LoadFailure::Unreadable {
            path: source.to_owned(),
            reason: e.to_string(),
        }
    })?;
    let sample_rate = i64::from(reader.spec().sample_rate);
    if sample_rate == 0 {
        return Ok(None);
    }
    let frames = i64::from(reader.duration());
    Ok(Some(TimeDelta::milliseconds(frames * 1000 / sample_rate)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, sample_rate: u32, frames: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..frames {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn sound_request(key: &str, exts: &[&str]) -> LoadRequest {
        LoadRequest {
            key: key.to_owned(),
            kind: AssetKind::Sound,
            sources: exts.iter().map(|ext| format!("audio/{key}.{ext}")).collect(),
        }
    }

    #[tokio::test]
    async fn test_falls_back_to_next_extension_and_reads_wav_duration() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("audio")).unwrap();
        write_wav(&dir.path().join("audio/song.wav"), 8000, 12_000);

        // Act
        let loaded = load_first_available(dir.path(), &sound_request("song", &["mp3", "wav"]))
            .await
            .unwrap();

        // Assert
        assert_eq!(loaded.source, "audio/song.wav");
        assert_eq!(loaded.duration, Some(TimeDelta::milliseconds(1500)));
    }

    #[tokio::test]
    async fn test_missing_everywhere_is_not_found() {
        let dir = tempfile::tempdir().unwrap();

        let result = load_first_available(dir.path(), &sound_request("song", &["mp3", "ogg"])).await;

        assert_eq!(
            result,
            Err(LoadFailure::NotFound(vec![
                "audio/song.mp3".into(),
                "audio/song.ogg".into()
            ]))
        );
    }

    #[tokio::test]
    async fn test_corrupt_wav_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("audio")).unwrap();
        std::fs::write(dir.path().join("audio/song.wav"), b"not a wav").unwrap();

        let result = load_first_available(dir.path(), &sound_request("song", &["wav"])).await;

        assert!(matches!(result, Err(LoadFailure::Unreadable { .. })));
    }

    #[tokio::test]
    async fn test_begin_load_reports_outcome_on_channel() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("img")).unwrap();
        std::fs::write(dir.path().join("img/title.png"), b"png").unwrap();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut loader = FsAssetLoader::new(dir.path(), tx);

        // Act
        loader.begin_load(LoadRequest {
            key: "title.png".into(),
            kind: AssetKind::Image,
            sources: vec!["img/title.png".into()],
        });
        let outcome = rx.recv().await.unwrap();

        // Assert
        assert_eq!(outcome.key, "title.png");
        assert_eq!(
            outcome.result,
            Ok(LoadedAsset {
                source: "img/title.png".into(),
                duration: None,
            })
        );
    }
}
