//! One-shot and ambient sounds, independent of the loop sequencer.

use std::collections::HashMap;

use chrono::TimeDelta;
use tracing::debug;
use underpass_assets::domain::sound_bank::PlaybackState;
use underpass_core::error::RuntimeError;
use underpass_core::scheduler::{Scheduler, TimerId, TimerTask};

use super::mixer::Mixer;
use crate::domain::one_shot::OneShotState;

/// Plays sounds by key and fades them out on stop.
#[derive(Debug)]
pub struct OneShotPlayer {
    states: HashMap<String, OneShotState>,
    stop_fade: TimeDelta,
}

impl OneShotPlayer {
    /// Creates a player whose stops fade over `stop_fade`.
    #[must_use]
    pub fn new(stop_fade: TimeDelta) -> Self {
        Self {
            states: HashMap::new(),
            stop_fade,
        }
    }

    /// State of `key`; sounds never played are `Stopped`.
    #[must_use]
    pub fn state(&self, key: &str) -> OneShotState {
        self.states.get(key).copied().unwrap_or_default()
    }

    /// Plays `key` at its configured volume. A sound still fading out from an
    /// earlier stop is halted and restored first, and its pending fade timer
    /// is cancelled.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::UnknownSound` if `key` was never declared.
    pub fn play_one_shot(
        &mut self,
        key: &str,
        mixer: &mut Mixer,
        scheduler: &mut dyn Scheduler,
    ) -> Result<(), RuntimeError> {
        let configured = mixer.bank().get(key)?.configured_volume();

        if let OneShotState::Fading { timer } = self.state(key) {
            scheduler.cancel(timer);
            mixer.stop(key)?;
            mixer.set_volume(key, configured)?;
            debug!(key, "fade-out interrupted by replay");
        }

        let state = if mixer.play(key, None)? {
            OneShotState::Playing
        } else {
            OneShotState::Stopped
        };
        self.states.insert(key.to_owned(), state);
        Ok(())
    }

    /// Fades `key` out; it is halted and its volume restored once the fade
    /// completes. Applies to any playing voice of the key, including loop
    /// layers started by the sequencer. No-op when the sound is silent or
    /// already fading out.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::UnknownSound` if `key` was never declared.
    pub fn stop_one_shot(
        &mut self,
        key: &str,
        mixer: &mut Mixer,
        scheduler: &mut dyn Scheduler,
    ) -> Result<(), RuntimeError> {
        let handle = mixer.bank().get(key)?;
        let from = handle.volume;
        let audible = match self.state(key) {
            OneShotState::Playing => true,
            OneShotState::Fading { .. } => false,
            OneShotState::Stopped => handle.state == PlaybackState::Playing,
        };

        if !audible {
            debug!(key, "sound not playing; stop ignored");
            return Ok(());
        }

        mixer.fade(key, from, 0.0, self.stop_fade)?;
        let timer = scheduler.after(self.stop_fade, TimerTask::FadeComplete(key.to_owned()));
        self.states
            .insert(key.to_owned(), OneShotState::Fading { timer });
        Ok(())
    }

    /// Completes a fade-out started by `stop_one_shot`. Timers that no longer
    /// match the sound's pending fade are ignored.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::UnknownSound` if `key` was never declared.
    pub fn on_fade_complete(
        &mut self,
        key: &str,
        timer: TimerId,
        mixer: &mut Mixer,
    ) -> Result<(), RuntimeError> {
        if self.state(key) != (OneShotState::Fading { timer }) {
            return Ok(());
        }
        let configured = mixer.bank().get(key)?.configured_volume();
        mixer.stop(key)?;
        mixer.set_volume(key, configured)?;
        self.states.insert(key.to_owned(), OneShotState::Stopped);
        debug!(key, "fade-out complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use underpass_assets::domain::catalog::AssetDescriptor;
    use underpass_core::scheduler::TimerQueue;
    use underpass_test_support::{AudioCall, ManualClock, RecordingAudioBackend};

    use super::*;

    struct Rig {
        clock: Arc<ManualClock>,
        timers: TimerQueue,
        backend: RecordingAudioBackend,
        mixer: Mixer,
        player: OneShotPlayer,
    }

    impl Rig {
        fn new() -> Self {
            let clock = Arc::new(ManualClock::at_epoch());
            let backend = RecordingAudioBackend::new();
            let mut mixer = Mixer::new(Box::new(backend.clone()));
            mixer.bank_mut().insert(
                &AssetDescriptor::sound("subway_ambient_loop", ["wav"])
                    .with_looping(true)
                    .with_volume(0.6),
            );
            Self {
                timers: TimerQueue::new(clock.clone()),
                clock,
                backend,
                mixer,
                player: OneShotPlayer::new(TimeDelta::seconds(1)),
            }
        }

        fn play(&mut self) {
            self.player
                .play_one_shot("subway_ambient_loop", &mut self.mixer, &mut self.timers)
                .unwrap();
        }

        fn stop(&mut self) {
            self.player
                .stop_one_shot("subway_ambient_loop", &mut self.mixer, &mut self.timers)
                .unwrap();
        }

        fn frame(&mut self, ms: i64) {
            self.clock.advance_ms(ms);
            self.timers.begin_frame();
            while let Some((id, task)) = self.timers.pop_ready() {
                if let TimerTask::FadeComplete(key) = task {
                    self.player
                        .on_fade_complete(&key, id, &mut self.mixer)
                        .unwrap();
                }
            }
        }
    }

    #[test]
    fn test_stop_fades_then_halts_and_restores_volume() {
        // Arrange
        let mut rig = Rig::new();
        rig.play();

        // Act
        rig.stop();
        let mid_fade = rig.player.state("subway_ambient_loop");
        rig.frame(1000);

        // Assert
        assert!(matches!(mid_fade, OneShotState::Fading { .. }));
        assert_eq!(rig.player.state("subway_ambient_loop"), OneShotState::Stopped);
        assert_eq!(
            rig.backend.calls(),
            vec![
                AudioCall::Play("subway_ambient_loop".into(), 0.6, true),
                AudioCall::Fade("subway_ambient_loop".into(), 0.6, 0.0, TimeDelta::seconds(1)),
                AudioCall::Stop("subway_ambient_loop".into()),
                AudioCall::SetVolume("subway_ambient_loop".into(), 0.6),
            ]
        );
    }

    #[test]
    fn test_replay_during_fade_cancels_stale_stop() {
        // Arrange
        let mut rig = Rig::new();
        rig.play();
        rig.stop();
        rig.frame(500);

        // Act
        rig.play();
        rig.frame(1000);

        // Assert
        assert_eq!(rig.player.state("subway_ambient_loop"), OneShotState::Playing);
        let calls = rig.backend.calls();
        assert_eq!(
            calls.last(),
            Some(&AudioCall::Play("subway_ambient_loop".into(), 0.6, true))
        );
        assert_eq!(
            calls
                .iter()
                .filter(|c| matches!(c, AudioCall::Stop(_)))
                .count(),
            1
        );
        assert_eq!(rig.timers.pending(), 0);
    }

    #[test]
    fn test_stop_fades_sound_started_outside_the_player() {
        // Arrange
        let mut rig = Rig::new();
        rig.mixer.play("subway_ambient_loop", Some(0.4)).unwrap();
        rig.backend.take();

        // Act
        rig.stop();
        rig.frame(1000);

        // Assert
        assert_eq!(rig.player.state("subway_ambient_loop"), OneShotState::Stopped);
        assert_eq!(
            rig.backend.calls(),
            vec![
                AudioCall::Fade("subway_ambient_loop".into(), 0.4, 0.0, TimeDelta::seconds(1)),
                AudioCall::Stop("subway_ambient_loop".into()),
                AudioCall::SetVolume("subway_ambient_loop".into(), 0.6),
            ]
        );
    }

    #[test]
    fn test_second_stop_during_fade_is_ignored() {
        let mut rig = Rig::new();
        rig.play();
        rig.stop();

        rig.stop();

        assert_eq!(rig.timers.pending(), 1);
    }

    #[test]
    fn test_stop_when_not_playing_is_noop() {
        let mut rig = Rig::new();

        rig.stop();

        assert!(rig.backend.calls().is_empty());
        assert_eq!(rig.timers.pending(), 0);
    }

    #[test]
    fn test_unknown_sound_is_an_error() {
        let mut rig = Rig::new();

        let result = rig
            .player
            .play_one_shot("subway_horn", &mut rig.mixer, &mut rig.timers);

        assert!(matches!(result, Err(RuntimeError::UnknownSound(_))));
    }
}
