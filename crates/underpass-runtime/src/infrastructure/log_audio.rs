//! Audio backend for hosts without a sound device.
//!
//! Every mix change is emitted as a structured log event, so the music
//! sequencer can be followed in the log stream.

use chrono::TimeDelta;
use tracing::info;
use underpass_core::audio::AudioBackend;

/// Logs audio commands instead of producing sound.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAudioBackend;

impl AudioBackend for LogAudioBackend {
    fn play(&mut self, key: &str, volume: f32, looping: bool) {
        info!(target: "underpass::audio", key, volume, looping, "play");
    }

    fn stop(&mut self, key: &str) {
        info!(target: "underpass::audio", key, "stop");
    }

    fn set_volume(&mut self, key: &str, volume: f32) {
        info!(target: "underpass::audio", key, volume, "set volume");
    }

    fn fade(&mut self, key: &str, from: f32, to: f32, duration: TimeDelta) {
        info!(
            target: "underpass::audio",
            key,
            from,
            to,
            duration_ms = duration.num_milliseconds(),
            "fade"
        );
    }
}
