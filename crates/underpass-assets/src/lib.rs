//! Underpass runtime — asset catalog and preload barrier.
//!
//! Responsible for declaring the images and sounds the game needs, issuing
//! their loads at startup, and releasing the boundary once every blocking
//! asset has reported in.

pub mod application;
pub mod domain;
