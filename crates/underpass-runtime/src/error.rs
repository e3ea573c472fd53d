//! Underpass runtime — host error types.

use thiserror::Error;
use underpass_core::error::RuntimeError;

/// Startup errors for the host binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The game manifest could not be parsed or validated.
    #[error("manifest error: {0}")]
    Manifest(#[from] RuntimeError),

    /// Reading the manifest, the image root or the save file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
