//! Linear volume ramps.

use chrono::{DateTime, TimeDelta, Utc};

/// A linear ramp from one level to another, evaluated against the clock.
/// A settled level is a fade of zero length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    from: f32,
    to: f32,
    started_at: DateTime<Utc>,
    duration: TimeDelta,
}

impl Fade {
    /// A constant level.
    #[must_use]
    pub fn settled(level: f32) -> Self {
        Self {
            from: level,
            to: level,
            started_at: DateTime::<Utc>::MIN_UTC,
            duration: TimeDelta::zero(),
        }
    }

    /// A ramp from `from` to `to` starting at `started_at`.
    #[must_use]
    pub fn new(from: f32, to: f32, started_at: DateTime<Utc>, duration: TimeDelta) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
        }
    }

    /// Level the ramp is heading to.
    #[must_use]
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Whether the ramp has reached its target at `now`.
    #[must_use]
    pub fn is_complete(&self, now: DateTime<Utc>) -> bool {
        self.duration <= TimeDelta::zero() || now >= self.started_at + self.duration
    }

    /// Time left until the target is reached.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> TimeDelta {
        if self.is_complete(now) {
            TimeDelta::zero()
        } else {
            self.started_at + self.duration - now
        }
    }

    /// Interpolated level at `now`.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn level_at(&self, now: DateTime<Utc>) -> f32 {
        if self.is_complete(now) {
            return self.to;
        }
        if now <= self.started_at {
            return self.from;
        }
        let elapsed = (now - self.started_at).num_milliseconds() as f64;
        let total = self.duration.num_milliseconds() as f64;
        let t = (elapsed / total).clamp(0.0, 1.0) as f32;
        self.from + (self.to - self.from) * t
    }
}
