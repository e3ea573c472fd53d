//! Timing configuration shared by the sequencer, one-shot fades and save
//! delivery.

use chrono::TimeDelta;
use serde::Deserialize;

/// Fixed durations used by the runtime, in milliseconds as declared in the
/// game manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// How long `addDrama` / `removeDrama` take to reach their target.
    pub drama_fade_ms: u32,
    /// How long a stopped one-shot takes to fade out before it is halted.
    pub stop_fade_ms: u32,
    /// Artificial latency before a loaded save is delivered to the boundary.
    pub load_delay_ms: u32,
    /// Nominal display frame interval used by the host's tick loop.
    pub frame_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            drama_fade_ms: 1000,
            stop_fade_ms: 1000,
            load_delay_ms: 100,
            frame_ms: 16,
        }
    }
}

impl Timings {
    /// Drama fade duration.
    #[must_use]
    pub fn drama_fade(&self) -> TimeDelta {
        TimeDelta::milliseconds(i64::from(self.drama_fade_ms))
    }

    /// One-shot stop fade duration.
    #[must_use]
    pub fn stop_fade(&self) -> TimeDelta {
        TimeDelta::milliseconds(i64::from(self.stop_fade_ms))
    }

    /// Save delivery delay.
    #[must_use]
    pub fn load_delay(&self) -> TimeDelta {
        TimeDelta::milliseconds(i64::from(self.load_delay_ms))
    }

    /// Frame interval.
    #[must_use]
    pub fn frame(&self) -> TimeDelta {
        TimeDelta::milliseconds(i64::from(self.frame_ms))
    }
}
