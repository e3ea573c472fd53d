//! Recording audio backend.

use std::sync::{Arc, Mutex};

use chrono::TimeDelta;
use underpass_core::audio::AudioBackend;

/// One call made against the audio port.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    /// `play(key, volume, looping)`
    Play(String, f32, bool),
    /// `stop(key)`
    Stop(String),
    /// `set_volume(key, volume)`
    SetVolume(String, f32),
    /// `fade(key, from, to, duration)`
    Fade(String, f32, f32, TimeDelta),
}

/// An audio backend that records calls instead of making sound.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudioBackend {
    calls: Arc<Mutex<Vec<AudioCall>>>,
}

impl RecordingAudioBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every call made so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Removes and returns every call made so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn take(&self) -> Vec<AudioCall> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn record(&self, call: AudioCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl AudioBackend for RecordingAudioBackend {
    fn play(&mut self, key: &str, volume: f32, looping: bool) {
        self.record(AudioCall::Play(key.to_owned(), volume, looping));
    }

    fn stop(&mut self, key: &str) {
        self.record(AudioCall::Stop(key.to_owned()));
    }

    fn set_volume(&mut self, key: &str, volume: f32) {
        self.record(AudioCall::SetVolume(key.to_owned(), volume));
    }

    fn fade(&mut self, key: &str, from: f32, to: f32, duration: TimeDelta) {
        self.record(AudioCall::Fade(key.to_owned(), from, to, duration));
    }
}
