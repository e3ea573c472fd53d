//! Mixer — the sound bank in front of the audio backend.
//!
//! Every playback request goes through here so that handle state stays in
//! step with what the backend was told, and so that sounds whose load failed
//! are silently skipped instead of reaching the backend.

use chrono::TimeDelta;
use tracing::warn;
use underpass_assets::domain::sound_bank::{PlaybackState, SoundBank};
use underpass_core::audio::AudioBackend;
use underpass_core::error::RuntimeError;

/// Sound handles plus the backend that makes them audible.
pub struct Mixer {
    bank: SoundBank,
    backend: Box<dyn AudioBackend>,
}

impl std::fmt::Debug for Mixer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mixer")
            .field("bank", &self.bank)
            .finish_non_exhaustive()
    }
}

impl Mixer {
    /// Creates a mixer with an empty bank.
    #[must_use]
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            bank: SoundBank::new(),
            backend,
        }
    }

    /// The sound handles.
    #[must_use]
    pub fn bank(&self) -> &SoundBank {
        &self.bank
    }

    /// The sound handles, for the preload step.
    pub fn bank_mut(&mut self) -> &mut SoundBank {
        &mut self.bank
    }

    /// Plays `key` at `volume`, or at its configured volume when `None`,
    /// repeating if the sound was declared looping. Returns `false` when the
    /// handle is unusable.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::UnknownSound` if `key` was never declared.
    pub fn play(&mut self, key: &str, volume: Option<f32>) -> Result<bool, RuntimeError> {
        let handle = self.bank.get_mut(key)?;
        if !handle.is_usable() {
            warn!(key, "sound failed to load; play ignored");
            return Ok(false);
        }
        let volume = volume.unwrap_or(handle.configured_volume());
        let looping = handle.looping();
        handle.volume = volume;
        handle.state = PlaybackState::Playing;
        self.backend.play(key, volume, looping);
        Ok(true)
    }

    /// Stops every voice of `key`.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::UnknownSound` if `key` was never declared.
    pub fn stop(&mut self, key: &str) -> Result<bool, RuntimeError> {
        let handle = self.bank.get_mut(key)?;
        if !handle.is_usable() {
            return Ok(false);
        }
        handle.state = PlaybackState::Stopped;
        self.backend.stop(key);
        Ok(true)
    }

    /// Sets the volume of `key` immediately.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::UnknownSound` if `key` was never declared.
    pub fn set_volume(&mut self, key: &str, volume: f32) -> Result<bool, RuntimeError> {
        let handle = self.bank.get_mut(key)?;
        if !handle.is_usable() {
            return Ok(false);
        }
        handle.volume = volume;
        self.backend.set_volume(key, volume);
        Ok(true)
    }

    /// Ramps `key` from `from` to `to` over `duration`.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::UnknownSound` if `key` was never declared.
    pub fn fade(
        &mut self,
        key: &str,
        from: f32,
        to: f32,
        duration: TimeDelta,
    ) -> Result<bool, RuntimeError> {
        let handle = self.bank.get_mut(key)?;
        if !handle.is_usable() {
            return Ok(false);
        }
        handle.volume = to;
        self.backend.fade(key, from, to, duration);
        Ok(true)
    }
}
