//! Game manifest — the YAML document the catalog and timings are read from.
//!
//! ```yaml
//! scan_images: true
//! sounds:
//!   - { key: subway_ambient_loop, exts: [wav], blocking: true, loop: true, volume: 0.6 }
//!   - { key: subway_arrival, exts: [wav] }
//! loops:
//!   - { key: platform, base: song, drama: piano2, length_ms: 9600 }
//! timings:
//!   drama_fade_ms: 1000
//! ```

use chrono::TimeDelta;
use serde::Deserialize;
use underpass_core::config::Timings;
use underpass_core::error::RuntimeError;

use super::catalog::{AssetCatalog, AssetDescriptor, LoopDefinition};

/// A sound entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SoundEntry {
    /// Sound key; sources are `audio/<key>.<ext>`.
    pub key: String,
    /// Candidate extensions in fallback order.
    pub exts: Vec<String>,
    /// Gates startup.
    #[serde(default, alias = "wait_for_load")]
    pub blocking: bool,
    /// Repeats natively.
    #[serde(default, rename = "loop")]
    pub looping: bool,
    /// Playback volume.
    #[serde(default = "full_volume")]
    pub volume: f32,
}

/// An explicitly declared image.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageEntry {
    /// Path relative to the image root.
    pub path: String,
    /// Gates startup.
    #[serde(default = "blocking_by_default")]
    pub blocking: bool,
}

/// A loop entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoopEntry {
    /// Loop key.
    pub key: String,
    /// Base layer sound key.
    pub base: String,
    /// Drama layer sound key.
    #[serde(default)]
    pub drama: Option<String>,
    /// Loop length; derived from the base layer when absent.
    #[serde(default)]
    pub length_ms: Option<u32>,
}

/// The whole manifest document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameManifest {
    /// Declared sounds.
    #[serde(default)]
    pub sounds: Vec<SoundEntry>,
    /// Declared images.
    #[serde(default)]
    pub images: Vec<ImageEntry>,
    /// Preload every file under the image root as a blocking image.
    #[serde(default)]
    pub scan_images: bool,
    /// Music loops.
    #[serde(default)]
    pub loops: Vec<LoopEntry>,
    /// Fade and delivery timings.
    #[serde(default)]
    pub timings: Timings,
}

fn full_volume() -> f32 {
    1.0
}

fn blocking_by_default() -> bool {
    true
}

impl GameManifest {
    /// Parses a manifest from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Catalog` if the document is not a valid
    /// manifest.
    pub fn from_yaml(text: &str) -> Result<Self, RuntimeError> {
        serde_yaml::from_str(text)
            .map_err(|e| RuntimeError::Catalog(format!("manifest parse failed: {e}")))
    }

    /// Builds the validated catalog. `discovered_images` are paths found by
    /// scanning the image root; an explicit image entry for the same path
    /// wins.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Catalog` if catalog validation fails.
    pub fn to_catalog(&self, discovered_images: &[String]) -> Result<AssetCatalog, RuntimeError> {
        let mut assets: Vec<AssetDescriptor> = self
            .images
            .iter()
            .map(|img| AssetDescriptor::image(&img.path).with_blocking(img.blocking))
            .collect();

        for path in discovered_images {
            if !self.images.iter().any(|img| &img.path == path) {
                assets.push(AssetDescriptor::image(path));
            }
        }

        assets.extend(self.sounds.iter().map(|s| {
            AssetDescriptor::sound(&s.key, s.exts.iter().cloned())
                .with_blocking(s.blocking)
                .with_looping(s.looping)
                .with_volume(s.volume)
        }));

        let loops = self
            .loops
            .iter()
            .map(|l| LoopDefinition {
                key: l.key.clone(),
                base: l.base.clone(),
                drama: l.drama.clone(),
                length: l.length_ms.map(|ms| TimeDelta::milliseconds(i64::from(ms))),
            })
            .collect();

        AssetCatalog::new(assets, loops)
    }
}
