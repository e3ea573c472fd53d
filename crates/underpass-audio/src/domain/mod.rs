//! Domain types for adaptive music.

pub mod fade;
pub mod loop_state;
pub mod one_shot;
