//! Application services for save slots.

pub mod save_store;
