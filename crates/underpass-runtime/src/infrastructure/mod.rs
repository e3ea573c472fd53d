//! Adapters for the headless host.

pub mod file_store;
pub mod fs_loader;
pub mod log_audio;
pub mod stdio_sink;
