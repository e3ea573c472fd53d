//! Store implementations.

pub mod memory_store;
