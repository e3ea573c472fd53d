//! Application services for adaptive music.

pub mod mixer;
pub mod one_shot_player;
pub mod sequencer;
