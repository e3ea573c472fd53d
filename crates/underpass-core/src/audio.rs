//! Audio output abstraction.

use chrono::TimeDelta;

/// Port to the platform audio engine.
///
/// Keys are catalog sound keys. A backend may start a new voice on every
/// `play`; `stop`, `set_volume` and `fade` apply to every voice of the key.
pub trait AudioBackend {
    /// Start playing `key` at `volume`. A `looping` voice repeats until
    /// stopped.
    fn play(&mut self, key: &str, volume: f32, looping: bool);

    /// Halt every voice of `key`.
    fn stop(&mut self, key: &str);

    /// Set the volume of `key` immediately.
    fn set_volume(&mut self, key: &str, volume: f32);

    /// Ramp the volume of `key` from `from` to `to` over `duration`.
    fn fade(&mut self, key: &str, from: f32, to: f32, duration: TimeDelta);
}
