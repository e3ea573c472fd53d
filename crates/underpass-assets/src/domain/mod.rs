//! Domain types for asset preloading.

pub mod barrier;
pub mod catalog;
pub mod manifest;
pub mod sound_bank;
