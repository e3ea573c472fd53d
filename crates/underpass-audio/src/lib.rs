//! Underpass runtime — adaptive music.
//!
//! Responsible for the layered loop sequencer (base loops with a crossfaded
//! drama overlay, switched only on loop boundaries) and for independent
//! one-shot sounds that fade out when stopped.

pub mod application;
pub mod domain;
