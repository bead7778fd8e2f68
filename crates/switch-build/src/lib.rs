//! Build-system abstraction for switchws
//!
//! A [`BuildServer`] answers "which builds of a definition finished in this
//! window". The [`BuildSelector`] scans backwards day by day for the most
//! recent build that succeeded and still has its artifacts on disk.

pub mod candidate;
pub mod drop_server;
pub mod error;
pub mod selector;
pub mod server;

pub use candidate::{ArtifactLayout, BuildCandidate, BuildStatus};
pub use drop_server::DropBuildServer;
pub use error::{Error, Result};
pub use selector::{BuildSelector, DEFAULT_WINDOW_DAYS};
pub use server::{BuildServer, FinishWindow};
