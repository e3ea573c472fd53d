//! Domain types for save slots.

pub mod record;
