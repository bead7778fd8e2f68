//! Error types for switch-fs

use std::path::PathBuf;

use crate::config::DocumentFormat;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid {format}: {message}")]
    Malformed {
        path: PathBuf,
        format: DocumentFormat,
        message: String,
    },

    #[error("Could not encode {path} as {format}: {message}")]
    Encode {
        path: PathBuf,
        format: DocumentFormat,
        message: String,
    },

    #[error("No document format for extension '{extension}' (expected toml, json, yaml or yml)")]
    UnknownFormat { extension: String },

    #[error("Could not lock {path} for writing")]
    Locked { path: PathBuf },
}

impl Error {
    /// Attach the path an I/O failure happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
