//! Timer scheduling abstraction.
//!
//! Components never hold callbacks. They schedule a [`TimerTask`] and the
//! runtime routes it back to the owning component when it comes due. Two
//! kinds of timers exist: frame tasks, which fire on the next display frame,
//! and delayed tasks, which fire on the first frame at or after their due
//! time. The same [`TimerQueue`] runs against the system clock in production
//! and a manually advanced clock in tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::clock::Clock;
use crate::message::Outbound;

/// Handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Work to perform when a timer fires.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerTask {
    /// Loop sequencer boundary check.
    LoopFrame,
    /// A one-shot fade-out has run its course.
    FadeComplete(String),
    /// Deliver a message to the boundary.
    Deliver(Outbound),
}

/// Port through which components schedule and cancel timers.
pub trait Scheduler {
    /// Schedule `task` for the next display frame.
    fn next_frame(&mut self, task: TimerTask) -> TimerId;

    /// Schedule `task` to run once `delay` has elapsed.
    fn after(&mut self, delay: TimeDelta, task: TimerTask) -> TimerId;

    /// Cancel a pending task. Returns `false` if it already ran or was
    /// cancelled before.
    fn cancel(&mut self, id: TimerId) -> bool;
}

/// Deterministic timer queue driven one frame at a time.
pub struct TimerQueue {
    clock: Arc<dyn Clock>,
    next_id: u64,
    frame: Vec<(TimerId, TimerTask)>,
    delayed: BTreeMap<(DateTime<Utc>, TimerId), TimerTask>,
    ready: VecDeque<(TimerId, TimerTask)>,
}

impl std::fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerQueue")
            .field("next_id", &self.next_id)
            .field("frame", &self.frame)
            .field("delayed", &self.delayed)
            .field("ready", &self.ready)
            .finish_non_exhaustive()
    }
}

impl TimerQueue {
    /// Creates an empty queue reading time from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            next_id: 0,
            frame: Vec::new(),
            delayed: BTreeMap::new(),
            ready: VecDeque::new(),
        }
    }

    fn allocate(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }

    /// Starts a display frame: every frame task scheduled before this call,
    /// followed by every delayed task now due (in due order), becomes ready.
    ///
    /// Tasks scheduled while the ready tasks are being processed wait for the
    /// following frame.
    pub fn begin_frame(&mut self) {
        let now = self.clock.now();
        self.ready.extend(self.frame.drain(..));

        let later = self.delayed.split_off(&(now, TimerId(u64::MAX)));
        let due = std::mem::replace(&mut self.delayed, later);
        self.ready
            .extend(due.into_iter().map(|((_, id), task)| (id, task)));

        if !self.ready.is_empty() {
            debug!(ready = self.ready.len(), "timer frame started");
        }
    }

    /// Pops the next ready task of the current frame.
    pub fn pop_ready(&mut self) -> Option<(TimerId, TimerTask)> {
        self.ready.pop_front()
    }

    /// Number of tasks not yet run, across all kinds.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.frame.len() + self.delayed.len() + self.ready.len()
    }
}

impl Scheduler for TimerQueue {
    fn next_frame(&mut self, task: TimerTask) -> TimerId {
        let id = self.allocate();
        self.frame.push((id, task));
        id
    }

    fn after(&mut self, delay: TimeDelta, task: TimerTask) -> TimerId {
        let id = self.allocate();
        let due = self.clock.now() + delay;
        self.delayed.insert((due, id), task);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        if let Some(pos) = self.frame.iter().position(|(tid, _)| *tid == id) {
            self.frame.remove(pos);
            return true;
        }
        if let Some(pos) = self.ready.iter().position(|(tid, _)| *tid == id) {
            self.ready.remove(pos);
            return true;
        }
        let key = self.delayed.keys().find(|(_, tid)| *tid == id).copied();
        key.is_some_and(|key| self.delayed.remove(&key).is_some())
    }
}
