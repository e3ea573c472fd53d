//! Asset loading abstraction.
//!
//! Loads are fire-and-forget: the runtime issues a [`LoadRequest`] and later
//! receives a [`LoadOutcome`] for it, in no particular order relative to
//! other assets.

use chrono::TimeDelta;
use thiserror::Error;

/// The two families of preloaded assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// A picture fetched so that later draws hit the cache.
    Image,
    /// A decoded, playable sound.
    Sound,
}

/// Request to load one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Catalog key the outcome must be reported under.
    pub key: String,
    /// What to load.
    pub kind: AssetKind,
    /// Candidate sources, tried in order until one succeeds.
    pub sources: Vec<String>,
}

/// A successfully loaded asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedAsset {
    /// The candidate source that was used.
    pub source: String,
    /// Decoded playback length, when the loader could determine one.
    pub duration: Option<TimeDelta>,
}

/// Why an asset could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    /// None of the candidate sources exist.
    #[error("no candidate source found among {0:?}")]
    NotFound(Vec<String>),

    /// A source exists but could not be read or decoded.
    #[error("failed to load {path}: {reason}")]
    Unreadable {
        /// The source that failed.
        path: String,
        /// Human-readable cause.
        reason: String,
    },
}

/// Completion report for a [`LoadRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Catalog key of the asset.
    pub key: String,
    /// Result of the load.
    pub result: Result<LoadedAsset, LoadFailure>,
}

/// Port through which asset loads are started.
pub trait AssetLoader {
    /// Begin loading asynchronously. The outcome is delivered back to the
    /// runtime out of band.
    fn begin_load(&mut self, request: LoadRequest);
}
