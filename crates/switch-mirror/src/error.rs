//! Error types for switch-mirror

/// Result type for switch-mirror operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while mirroring
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The mirror tool could not be started or waited on
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while supervising the mirror process
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
