//! Application handlers for asset preloading.

pub mod preload;
