//! Per-sound stop state machine.

use underpass_core::scheduler::TimerId;

/// Lifecycle of a sound played outside the loop sequencer.
///
/// `Playing → Fading → Stopped`. Playing again while fading cancels the fade
/// timer and goes straight back to `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OneShotState {
    /// Audible at its configured volume.
    Playing,
    /// Fading out; `timer` halts it when the fade ends.
    Fading {
        /// Pending fade-completion timer.
        timer: TimerId,
    },
    /// Silent.
    #[default]
    Stopped,
}
