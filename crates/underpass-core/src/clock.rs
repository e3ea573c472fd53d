//! Clock abstraction for determinism.
//!
//! Loop boundaries, fades and save timestamps all read the time through this
//! trait, so tests can drive the whole runtime on a virtual clock. Elapsed
//! time is measured with `Clock::since` rather than by comparing instants
//! taken from different sources.

use chrono::{DateTime, TimeDelta, Utc};

/// Abstraction over wall-clock time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Time elapsed since `earlier`, an instant previously read from this
    /// clock. Negative if `earlier` lies in the future.
    fn since(&self, earlier: DateTime<Utc>) -> TimeDelta {
        self.now() - earlier
    }
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
