//! Error types for switch-vcs

use std::path::PathBuf;

/// Result type for switch-vcs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in switch-vcs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] switch_fs::Error),

    #[error("No workspace is mapped at {path}")]
    WorkspaceNotFound { path: PathBuf },

    #[error("Workspace '{name}' already exists at {path}")]
    WorkspaceExists { name: String, path: PathBuf },

    #[error("Revision '{revision}' not found")]
    RevisionNotFound { revision: String },

    #[error("Item {path} does not exist at revision {revision}")]
    ItemNotFound { path: String, revision: String },

    #[error("Server path {path} is not a file")]
    NotAFile { path: String },
}
