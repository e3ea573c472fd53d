//! Underpass Core — shared runtime abstractions.
//!
//! This crate defines the ports every component depends on (clock, timer
//! scheduling, asset loading, audio output, key-value storage, the boundary
//! message channel) together with the shared error and message types. It
//! contains no infrastructure code.

pub mod audio;
pub mod clock;
pub mod config;
pub mod error;
pub mod loader;
pub mod message;
pub mod scheduler;
pub mod store;
