//! Loop sequencer.
//!
//! Background music is a chain of short loops, each optionally paired with a
//! drama layer. Loops are re-triggered by polling the clock once per display
//! frame; a queued loop only takes over at the next boundary, so switching
//! can lag by up to one loop length but never cuts a loop mid-phrase.
//!
//! ```text
//!   Idle --queue_loop--> Looping --boundary--> Looping
//!     ^                     |
//!     +-----stop_music------+
//! ```

use std::collections::HashMap;

use chrono::TimeDelta;
use tracing::{debug, error, info};
use underpass_assets::domain::catalog::LoopDefinition;
use underpass_assets::domain::sound_bank::SoundBank;
use underpass_core::clock::Clock;
use underpass_core::error::RuntimeError;
use underpass_core::scheduler::{Scheduler, TimerId, TimerTask};

use super::mixer::Mixer;
use crate::domain::fade::Fade;
use crate::domain::loop_state::LoopState;

/// Owns the loop state and its polling timer.
#[derive(Debug)]
pub struct LoopSequencer {
    loops: HashMap<String, LoopDefinition>,
    state: LoopState,
    frame_timer: Option<TimerId>,
    drama_fade: TimeDelta,
}

/// Resolves the length of `def`: the configured length, else two-thirds of
/// the base layer's decoded duration so the tail can ring out under the next
/// iteration.
///
/// # Errors
///
/// Returns `RuntimeError::LoopLengthUnavailable` when neither is known.
pub fn loop_length(def: &LoopDefinition, bank: &SoundBank) -> Result<TimeDelta, RuntimeError> {
    if let Some(length) = def.length {
        return Ok(length);
    }
    bank.get(&def.base)?
        .duration()
        .filter(|d| *d > TimeDelta::zero())
        .map(|d| d * 2 / 3)
        .ok_or_else(|| RuntimeError::LoopLengthUnavailable(def.key.clone()))
}

impl LoopSequencer {
    /// Creates an idle sequencer over `loops`.
    #[must_use]
    pub fn new(loops: &[LoopDefinition], drama_fade: TimeDelta) -> Self {
        Self {
            loops: loops
                .iter()
                .map(|def| (def.key.clone(), def.clone()))
                .collect(),
            state: LoopState::default(),
            frame_timer: None,
            drama_fade,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &LoopState {
        &self.state
    }

    fn definition(&self, key: &str) -> Result<&LoopDefinition, RuntimeError> {
        self.loops
            .get(key)
            .ok_or_else(|| RuntimeError::UnknownLoop(key.to_owned()))
    }

    /// Queues `key` for the next boundary, or starts it at once when idle.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::UnknownLoop` for an undeclared key, and
    /// `RuntimeError::LoopLengthUnavailable` when idle and the loop's length
    /// cannot be resolved. State is unchanged on error.
    pub fn queue_loop(
        &mut self,
        key: &str,
        mixer: &mut Mixer,
        clock: &dyn Clock,
        scheduler: &mut dyn Scheduler,
    ) -> Result<(), RuntimeError> {
        let def = self.definition(key)?;

        if !self.state.is_looping() {
            loop_length(def, mixer.bank())?;
        } else if self.state.next() != Some(key) {
            info!(loop_key = key, "loop queued for next boundary");
        }

        let idle = !self.state.is_looping();
        self.state.queue(key);
        if !idle {
            return Ok(());
        }
        self.advance(mixer, clock)?;
        self.frame_timer = Some(scheduler.next_frame(TimerTask::LoopFrame));
        Ok(())
    }

    /// Polling step, run once per display frame while looping. Advances when
    /// the current iteration has run its length, then re-arms itself.
    /// Frames from a cancelled timer are ignored.
    pub fn on_frame(
        &mut self,
        timer: TimerId,
        mixer: &mut Mixer,
        clock: &dyn Clock,
        scheduler: &mut dyn Scheduler,
    ) {
        if self.frame_timer != Some(timer) {
            return;
        }
        self.frame_timer = None;

        let (Some(current), Some(started_at)) = (self.state.current(), self.state.started_at())
        else {
            return;
        };

        let length = self
            .definition(current)
            .and_then(|def| loop_length(def, mixer.bank()));

        let result = match length {
            Ok(length) if clock.since(started_at) >= length => self.advance(mixer, clock),
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            error!(error = %e, "loop boundary failed; stopping music");
            self.stop_music(mixer, scheduler);
            return;
        }

        self.frame_timer = Some(scheduler.next_frame(TimerTask::LoopFrame));
    }

    /// Starts the next iteration: promotes the queued key, starts its base
    /// and drama layers, and records the start time.
    fn advance(&mut self, mixer: &mut Mixer, clock: &dyn Clock) -> Result<(), RuntimeError> {
        let Some(next) = self.state.next() else {
            return Ok(());
        };
        let def = self.definition(next)?.clone();
        let length = loop_length(&def, mixer.bank())?;

        let now = clock.now();
        let changed = self.state.begin_iteration(now);
        let drama = self.state.drama();

        mixer.play(&def.base, None)?;
        if let Some(drama_key) = &def.drama {
            let level = drama.level_at(now);
            mixer.play(drama_key, Some(level))?;
            if !drama.is_complete(now) {
                mixer.fade(drama_key, level, drama.target(), drama.remaining(now))?;
            }
        }

        if changed {
            info!(loop_key = %def.key, length_ms = length.num_milliseconds(), "loop started");
        } else {
            debug!(loop_key = %def.key, "loop repeated");
        }
        Ok(())
    }

    /// Fades the drama layer in.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::UnknownSound` only if the catalog is
    /// inconsistent with the loop definitions.
    pub fn add_drama(&mut self, mixer: &mut Mixer, clock: &dyn Clock) -> Result<(), RuntimeError> {
        self.fade_drama(1.0, mixer, clock)
    }

    /// Fades the drama layer out.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::UnknownSound` only if the catalog is
    /// inconsistent with the loop definitions.
    pub fn remove_drama(
        &mut self,
        mixer: &mut Mixer,
        clock: &dyn Clock,
    ) -> Result<(), RuntimeError> {
        self.fade_drama(0.0, mixer, clock)
    }

    fn fade_drama(
        &mut self,
        target: f32,
        mixer: &mut Mixer,
        clock: &dyn Clock,
    ) -> Result<(), RuntimeError> {
        let Some(current) = self.state.current() else {
            debug!("no loop playing; drama change ignored");
            return Ok(());
        };
        let drama_key = self.definition(current)?.drama.clone();

        let now = clock.now();
        let from = self.state.drama_volume(now);
        self.state
            .set_drama(Fade::new(from, target, now, self.drama_fade));

        if let Some(drama_key) = drama_key {
            mixer.fade(&drama_key, from, target, self.drama_fade)?;
        }
        debug!(from, target, "drama fade started");
        Ok(())
    }

    /// Stops both layers of the current loop and returns to idle.
    pub fn stop_music(&mut self, mixer: &mut Mixer, scheduler: &mut dyn Scheduler) {
        if let Some(timer) = self.frame_timer.take() {
            scheduler.cancel(timer);
        }

        if let Some(def) = self
            .state
            .current()
            .and_then(|key| self.loops.get(key))
            .cloned()
        {
            for layer in std::iter::once(&def.base).chain(def.drama.as_ref()) {
                if let Err(e) = mixer.stop(layer) {
                    error!(error = %e, "failed to stop loop layer");
                }
            }
            info!(loop_key = %def.key, "music stopped");
        }

        self.state.reset();
    }
}
