//! One-shot preload barrier.

use std::collections::HashSet;

use super::catalog::AssetDescriptor;

/// Count of blocking assets declared versus completed.
///
/// `0 <= completed <= required` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadCounter {
    required: usize,
    completed: usize,
}

impl LoadCounter {
    /// Blocking assets declared.
    #[must_use]
    pub fn required(&self) -> usize {
        self.required
    }

    /// Blocking assets completed.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Completed fraction in `[0, 1]`; `1.0` when nothing is required.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.required == 0 {
            1.0
        } else {
            self.completed as f64 / self.required as f64
        }
    }
}

/// What a completion signal did to the barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionEffect {
    /// Not a pending blocking asset, or the barrier already fired.
    Ignored,
    /// Counted; more blocking assets are outstanding.
    Progress {
        /// Completed so far.
        completed: usize,
        /// Declared.
        required: usize,
    },
    /// Counted, and this was the last one. The barrier is now inert.
    Ready {
        /// Declared.
        required: usize,
    },
}

/// Gate that releases exactly once when every registered blocking asset has
/// reported completion.
#[derive(Debug, Default)]
pub struct PreloadBarrier {
    counter: LoadCounter,
    pending: HashSet<String>,
    fired: bool,
}

impl PreloadBarrier {
    /// Creates an empty, unfired barrier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `descriptor` as required if it is blocking. Returns whether it
    /// was counted. Registration must finish before completions arrive.
    pub fn register(&mut self, descriptor: &AssetDescriptor) -> bool {
        if !descriptor.blocking || self.fired {
            return false;
        }
        if self.pending.insert(descriptor.key.clone()) {
            self.counter.required += 1;
            true
        } else {
            false
        }
    }

    /// Closes registration. Fires immediately, returning `true`, when nothing
    /// blocking was registered.
    pub fn seal(&mut self) -> bool {
        if !self.fired && self.counter.required == 0 {
            self.fired = true;
            return true;
        }
        false
    }

    /// Records a completion (successful or failed) for `key`.
    pub fn on_asset_complete(&mut self, key: &str) -> CompletionEffect {
        if self.fired || !self.pending.remove(key) {
            return CompletionEffect::Ignored;
        }
        self.counter.completed += 1;
        if self.counter.completed == self.counter.required {
            self.fired = true;
            CompletionEffect::Ready {
                required: self.counter.required,
            }
        } else {
            CompletionEffect::Progress {
                completed: self.counter.completed,
                required: self.counter.required,
            }
        }
    }

    /// Whether the barrier has fired.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.fired
    }

    /// Current counts.
    #[must_use]
    pub fn counter(&self) -> LoadCounter {
        self.counter
    }
}
