//! Version-control abstraction for switchws
//!
//! The orchestration layer only talks to a [`VersionControl`]: fetch items at
//! a revision into a mapped workspace, query an item's history and download
//! an item's content. [`GitDepot`] implements it on top of a git repository.

pub mod error;
pub mod fetch;
pub mod git;
pub mod history;
pub mod provider;
pub mod revision;
pub mod server_path;
pub mod workspace;

pub use error::{Error, Result};
pub use fetch::{FetchOptions, SyncResult};
pub use git::GitDepot;
pub use history::HistorySearcher;
pub use provider::{HistoryQuery, RevisionEntry, VersionControl};
pub use revision::{RevisionSpec, RevisionToken};
pub use server_path::ServerPath;
pub use workspace::{WorkingFolder, Workspace};
