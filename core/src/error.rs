use std::path::PathBuf;

use thiserror::Error;

/// Kiln error types
#[derive(Error, Debug)]
pub enum KilnError {
    /// Referenced Dockerfile or context directory does not exist
    #[error("Path not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Engine binary could not be spawned (absent or non-executable)
    #[error("Failed to spawn {binary}: {message}")]
    SpawnFailed { binary: String, message: String },

    /// Engine build exited nonzero
    #[error("Build failed: {stderr}")]
    BuildFailed { stderr: String },

    /// Build appeared to succeed but no image id was recoverable
    #[error("No image id in engine output: {0}")]
    ParseFailed(String),

    /// Image removal exited nonzero
    #[error("Failed to remove image {image}: {stderr}")]
    RemoveFailed { image: String, stderr: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for kiln operations
pub type Result<T> = std::result::Result<T, KilnError>;
