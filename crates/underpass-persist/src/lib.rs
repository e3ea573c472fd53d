//! Underpass runtime — save-game persistence.
//!
//! Responsible for listing, loading, writing and deleting named save slots.
//! Storage is best-effort: anything unreadable is treated as an empty slot.

pub mod application;
pub mod domain;
pub mod infrastructure;
