//! Command implementations for switch-cli

pub mod completions;
pub mod sync;

pub use completions::run_completions;
pub use sync::{SyncArgs, run_sync};
