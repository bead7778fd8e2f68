//! Directory mirroring for switchws
//!
//! Mirroring is delegated to an external tool (robocopy or rsync) running as
//! a child process. While it runs, the [`CopyProgressMonitor`] estimates
//! completion by comparing file counts of the destination and the source.

pub mod error;
pub mod launcher;
pub mod monitor;
pub mod tool;

pub use error::{Error, Result};
pub use launcher::{CommandLauncher, MirrorHandle, MirrorLauncher, MirrorOutcome};
pub use monitor::{CopyProgress, CopyProgressMonitor, MirrorReport, MonitorTiming, ProgressSink};
pub use tool::{MirrorTool, RetryPolicy};
