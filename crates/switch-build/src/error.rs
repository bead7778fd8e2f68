//! Error types for switch-build

use std::path::PathBuf;

/// Result type for switch-build operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in switch-build operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] switch_fs::Error),

    #[error("Drop root {path} does not exist")]
    DropRootMissing { path: PathBuf },

    #[error("Invalid build record at {path}: {message}")]
    InvalidRecord { path: PathBuf, message: String },
}
