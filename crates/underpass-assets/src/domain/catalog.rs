//! Declarative asset catalog.

use std::collections::HashSet;

use chrono::TimeDelta;
use underpass_core::error::RuntimeError;
use underpass_core::loader::AssetKind;

/// Path prefix for sound sources.
pub const SOUND_PREFIX: &str = "audio/";

/// Path prefix for image sources.
pub const IMAGE_PREFIX: &str = "img/";

/// One declared asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDescriptor {
    /// Logical key. For images this is the path relative to the image root.
    pub key: String,
    /// Image or sound.
    pub kind: AssetKind,
    /// Candidate file extensions, tried in order as format fallbacks.
    pub extensions: Vec<String>,
    /// Must finish loading before the game may start.
    pub blocking: bool,
    /// Sound repeats natively when played.
    pub looping: bool,
    /// Playback volume in `(0, 1]`.
    pub volume: f32,
}

impl AssetDescriptor {
    /// A non-blocking, non-looping sound at full volume.
    #[must_use]
    pub fn sound<I, S>(key: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            kind: AssetKind::Sound,
            extensions: extensions.into_iter().map(Into::into).collect(),
            blocking: false,
            looping: false,
            volume: 1.0,
        }
    }

    /// A blocking image at `path`.
    #[must_use]
    pub fn image(path: impl Into<String>) -> Self {
        Self {
            key: path.into(),
            kind: AssetKind::Image,
            extensions: Vec::new(),
            blocking: true,
            looping: false,
            volume: 1.0,
        }
    }

    /// Sets whether the asset gates startup.
    #[must_use]
    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    /// Sets the native loop flag.
    #[must_use]
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Sets the playback volume.
    #[must_use]
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    /// Candidate source paths, in fallback order.
    #[must_use]
    pub fn sources(&self) -> Vec<String> {
        match self.kind {
            AssetKind::Image => vec![format!("{IMAGE_PREFIX}{}", self.key)],
            AssetKind::Sound => self
                .extensions
                .iter()
                .map(|ext| format!("{SOUND_PREFIX}{}.{ext}", self.key))
                .collect(),
        }
    }
}

/// A music loop: a base layer with an optional drama overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopDefinition {
    /// Loop key requested by the boundary.
    pub key: String,
    /// Sound key of the base layer.
    pub base: String,
    /// Sound key of the drama layer, if the loop has one.
    pub drama: Option<String>,
    /// Configured loop length. When absent the length is derived from the
    /// base layer's decoded duration.
    pub length: Option<TimeDelta>,
}

impl LoopDefinition {
    /// A loop over `base` with no drama layer and a derived length.
    #[must_use]
    pub fn new(key: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            base: base.into(),
            drama: None,
            length: None,
        }
    }

    /// Sets the drama layer.
    #[must_use]
    pub fn with_drama(mut self, drama: impl Into<String>) -> Self {
        self.drama = Some(drama.into());
        self
    }

    /// Sets the configured length.
    #[must_use]
    pub fn with_length(mut self, length: TimeDelta) -> Self {
        self.length = Some(length);
        self
    }
}

/// Validated, immutable set of declared assets and loops.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    assets: Vec<AssetDescriptor>,
    loops: Vec<LoopDefinition>,
}

impl AssetCatalog {
    /// Builds a catalog, checking that keys are unique, sounds have at least
    /// one extension, volumes are in `(0, 1]`, and loops only reference
    /// declared sounds.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Catalog` describing the first violation found.
    pub fn new(
        assets: Vec<AssetDescriptor>,
        loops: Vec<LoopDefinition>,
    ) -> Result<Self, RuntimeError> {
        let mut keys = HashSet::new();
        for asset in &assets {
            if !keys.insert(asset.key.as_str()) {
                return Err(RuntimeError::Catalog(format!(
                    "asset {} declared twice",
                    asset.key
                )));
            }
            if asset.kind == AssetKind::Sound && asset.extensions.is_empty() {
                return Err(RuntimeError::Catalog(format!(
                    "sound {} has no extensions",
                    asset.key
                )));
            }
            if !(asset.volume > 0.0 && asset.volume <= 1.0) {
                return Err(RuntimeError::Catalog(format!(
                    "asset {} volume {} outside (0, 1]",
                    asset.key, asset.volume
                )));
            }
        }

        let is_sound = |key: &str| {
            assets
                .iter()
                .any(|a| a.kind == AssetKind::Sound && a.key == key)
        };
        let mut loop_keys = HashSet::new();
        for def in &loops {
            if !loop_keys.insert(def.key.as_str()) {
                return Err(RuntimeError::Catalog(format!(
                    "loop {} declared twice",
                    def.key
                )));
            }
            for layer in std::iter::once(&def.base).chain(def.drama.as_ref()) {
                if !is_sound(layer.as_str()) {
                    return Err(RuntimeError::Catalog(format!(
                        "loop {} references undeclared sound {layer}",
                        def.key
                    )));
                }
            }
            if def.length.is_some_and(|len| len <= TimeDelta::zero()) {
                return Err(RuntimeError::Catalog(format!(
                    "loop {} has a non-positive length",
                    def.key
                )));
            }
        }

        Ok(Self { assets, loops })
    }

    /// All declared assets, in declaration order.
    #[must_use]
    pub fn assets(&self) -> &[AssetDescriptor] {
        &self.assets
    }

    /// All declared loops.
    #[must_use]
    pub fn loops(&self) -> &[LoopDefinition] {
        &self.loops
    }

    /// Looks up an asset by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AssetDescriptor> {
        self.assets.iter().find(|a| a.key == key)
    }

    /// Number of assets that gate startup.
    #[must_use]
    pub fn blocking_count(&self) -> usize {
        self.assets.iter().filter(|a| a.blocking).count()
    }
}
