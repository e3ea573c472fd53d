//! Runtime error types.

use thiserror::Error;

/// Top-level error type shared by every runtime component.
///
/// None of these are fatal: the dispatcher logs them and carries on.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A sound key that the catalog never declared.
    #[error("unknown sound: {0}")]
    UnknownSound(String),

    /// A loop key that the catalog never declared.
    #[error("unknown loop: {0}")]
    UnknownLoop(String),

    /// The loop has no configured length and its base sound has no decoded
    /// duration to derive one from.
    #[error("loop length unavailable for {0}")]
    LoopLengthUnavailable(String),

    /// The catalog failed validation.
    #[error("invalid catalog: {0}")]
    Catalog(String),

    /// The key-value store rejected a read or write.
    #[error("storage error: {0}")]
    Storage(String),
}
