//! Sound handles, one per declared sound key.

use std::collections::HashMap;

use chrono::TimeDelta;
use underpass_core::error::RuntimeError;

use super::catalog::AssetDescriptor;

/// Where a sound's load stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Load issued, no outcome yet.
    Pending,
    /// Decoded and playable.
    Ready,
    /// Every source failed. Playback requests on this handle are dropped.
    Failed,
}

/// Whether the sound is audible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Not playing.
    Stopped,
    /// At least one voice is playing.
    Playing,
}

/// Opaque handle to a playable sound.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundHandle {
    key: String,
    configured_volume: f32,
    looping: bool,
    /// Volume the sound is currently set to (or fading toward).
    pub volume: f32,
    /// Playing or stopped.
    pub state: PlaybackState,
    status: LoadStatus,
    duration: Option<TimeDelta>,
}

impl SoundHandle {
    fn from_descriptor(descriptor: &AssetDescriptor) -> Self {
        Self {
            key: descriptor.key.clone(),
            configured_volume: descriptor.volume,
            looping: descriptor.looping,
            volume: descriptor.volume,
            state: PlaybackState::Stopped,
            status: LoadStatus::Pending,
            duration: None,
        }
    }

    /// The catalog key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Volume declared in the catalog.
    #[must_use]
    pub fn configured_volume(&self) -> f32 {
        self.configured_volume
    }

    /// Whether the sound repeats natively.
    #[must_use]
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Load status.
    #[must_use]
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Whether playback requests should reach the audio backend.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.status != LoadStatus::Failed
    }

    /// Decoded duration, if the loader reported one.
    #[must_use]
    pub fn duration(&self) -> Option<TimeDelta> {
        self.duration
    }
}

/// Map from sound key to its single handle. Written once per key when loading
/// begins; handles live for the whole session.
#[derive(Debug, Default)]
pub struct SoundBank {
    handles: HashMap<String, SoundHandle>,
}

impl SoundBank {
    /// Creates an empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the handle for `descriptor`. Returns `false` and leaves the
    /// existing handle untouched if the key already has one.
    pub fn insert(&mut self, descriptor: &AssetDescriptor) -> bool {
        if self.handles.contains_key(&descriptor.key) {
            return false;
        }
        self.handles.insert(
            descriptor.key.clone(),
            SoundHandle::from_descriptor(descriptor),
        );
        true
    }

    /// Looks up a handle.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::UnknownSound` if `key` was never declared.
    pub fn get(&self, key: &str) -> Result<&SoundHandle, RuntimeError> {
        self.handles
            .get(key)
            .ok_or_else(|| RuntimeError::UnknownSound(key.to_owned()))
    }

    /// Looks up a handle for mutation.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::UnknownSound` if `key` was never declared.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut SoundHandle, RuntimeError> {
        self.handles
            .get_mut(key)
            .ok_or_else(|| RuntimeError::UnknownSound(key.to_owned()))
    }

    /// Marks `key` loaded. Returns `false` if `key` is not a sound.
    pub fn mark_ready(&mut self, key: &str, duration: Option<TimeDelta>) -> bool {
        let Some(handle) = self.handles.get_mut(key) else {
            return false;
        };
        handle.status = LoadStatus::Ready;
        handle.duration = duration;
        true
    }

    /// Marks `key` unusable. Returns `false` if `key` is not a sound.
    pub fn mark_failed(&mut self, key: &str) -> bool {
        let Some(handle) = self.handles.get_mut(key) else {
            return false;
        };
        handle.status = LoadStatus::Failed;
        true
    }

    /// Number of handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the bank holds no handles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
