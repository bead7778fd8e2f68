//! Build resolution and workspace synchronization for switchws
//!
//! `switch-core` ties the Layer 0 crates together:
//!
//! - **Configuration**: [`SwitchConfig`] and the paths derived from it
//! - **Module pinning**: [`ModuleVersionResolver`] traces a module's declared
//!   version back to the revision that carries it
//! - **Orchestration**: [`SyncOrchestrator`] picks a build, fetches its
//!   sources, mirrors its artifacts and pins the configured modules
//!
//! ```text
//!                      switch-cli
//!                          |
//!                     switch-core
//!                          |
//!     +-----------+--------+-------+-------------+
//!     |           |                |             |
//! switch-fs  switch-vcs     switch-build  switch-mirror
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod module;
pub mod orchestrator;
pub mod report;

pub use config::{CONFIG_FILE_NAME, MirrorSettings, SwitchConfig};
pub use error::{Error, Result};
pub use module::{ModuleDescriptor, ModuleVersionResolver};
pub use orchestrator::{
    AssumeYes, SyncOrchestrator, SyncRequest, WORKSPACE_COMMENT, WorkspaceConfirm, WorkspacePlan,
};
pub use report::{ModuleOutcome, RunReport};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn error_workspace_declined_mentions_path() {
        let error = Error::WorkspaceDeclined {
            path: PathBuf::from("/work/Temp"),
        };
        let display = error.to_string();
        assert!(display.contains("/work/Temp"), "got: {display}");
    }

    #[test]
    fn error_no_usable_build_mentions_definition() {
        let error = Error::NoUsableBuild {
            definition: "Product.Main".into(),
            window_days: 15,
        };
        let display = error.to_string();
        assert!(display.contains("Product.Main") && display.contains("15"), "got: {display}");
    }
}
