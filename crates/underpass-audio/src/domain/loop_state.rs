//! Loop sequencer state.

use chrono::{DateTime, Utc};

use super::fade::Fade;

/// Which loop is playing, which is queued, and the drama level.
///
/// `started_at` is set exactly when `current` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopState {
    current: Option<String>,
    next: Option<String>,
    started_at: Option<DateTime<Utc>>,
    drama: Fade,
}

impl Default for LoopState {
    fn default() -> Self {
        Self {
            current: None,
            next: None,
            started_at: None,
            drama: Fade::settled(0.0),
        }
    }
}

impl LoopState {
    /// Key of the loop playing now.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Key of the loop that will play from the next boundary.
    #[must_use]
    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// When the current loop iteration started.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Whether a loop is active.
    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.current.is_some()
    }

    /// Drama layer level at `now`.
    #[must_use]
    pub fn drama_volume(&self, now: DateTime<Utc>) -> f32 {
        self.drama.level_at(now)
    }

    /// The drama ramp in effect.
    #[must_use]
    pub fn drama(&self) -> Fade {
        self.drama
    }

    pub(crate) fn queue(&mut self, key: &str) {
        self.next = Some(key.to_owned());
    }

    /// Promotes `next` to `current` and restarts the iteration clock. Drama
    /// drops to silence when the key changes. Returns whether it changed.
    pub(crate) fn begin_iteration(&mut self, now: DateTime<Utc>) -> bool {
        let changed = self.next != self.current;
        if changed {
            self.drama = Fade::settled(0.0);
        }
        self.current.clone_from(&self.next);
        self.started_at = self.current.as_ref().map(|_| now);
        changed
    }

    pub(crate) fn set_drama(&mut self, fade: Fade) {
        self.drama = fade;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    #[test]
    fn test_begin_iteration_resets_drama_only_on_key_change() {
        // Arrange
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let mut state = LoopState::default();
        state.queue("intro");
        state.begin_iteration(now);
        state.set_drama(Fade::settled(1.0));

        // Act
        let repeated = state.begin_iteration(now + TimeDelta::seconds(8));
        let level_after_repeat = state.drama_volume(now);
        state.queue("chase");
        let changed = state.begin_iteration(now + TimeDelta::seconds(16));

        // Assert
        assert!(!repeated);
        assert!((level_after_repeat - 1.0).abs() < f32::EPSILON);
        assert!(changed);
        assert!(state.drama_volume(now).abs() < f32::EPSILON);
        assert_eq!(state.current(), Some("chase"));
        assert_eq!(state.started_at(), Some(now + TimeDelta::seconds(16)));
    }

    #[test]
    fn test_reset_clears_every_field() {
        let mut state = LoopState::default();
        state.queue("intro");
        state.begin_iteration(Utc::now());

        state.reset();

        assert_eq!(state, LoopState::default());
        assert!(!state.is_looping());
        assert_eq!(state.started_at(), None);
    }
}
