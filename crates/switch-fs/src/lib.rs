//! Filesystem helpers for switchws
//!
//! Config loading, atomic writes and the file counting used to estimate
//! mirror progress.

pub mod config;
pub mod count;
pub mod error;
pub mod io;

pub use config::{ConfigStore, DocumentFormat};
pub use count::{count_files, dir_has_files};
pub use error::{Error, Result};
