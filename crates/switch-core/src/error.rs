//! Error types for switch-core

use std::path::PathBuf;

use switch_vcs::ServerPath;

/// Result type for switch-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in switch-core operations
///
/// Every variant except [`Error::HistorySearch`] ends the run. Module
/// resolution that finds no matching revision, or cannot search at all, is
/// reported through [`crate::ModuleOutcome::Skipped`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration is present but unusable
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// No configuration file in any of the searched locations
    #[error("Configuration not found, looked in: {}", display_paths(.searched))]
    ConfigNotFound { searched: Vec<PathBuf> },

    /// Workspace name cannot be used as a directory name
    #[error("Invalid workspace name '{name}'")]
    InvalidWorkspaceName { name: String },

    /// No workspace mapping exists and the user declined to create one
    #[error("Cannot continue without a workspace mapped at {path}")]
    WorkspaceDeclined { path: PathBuf },

    /// Explicitly requested build has no artifacts on disk
    #[error("No artifacts for build {build} at {path}")]
    ArtifactsMissing { build: String, path: PathBuf },

    /// Explicitly requested build is unknown to the build system
    #[error("Could not find build details for {build}")]
    BuildNotFound { build: String },

    /// No usable build in the scanned window
    #[error("No usable build of {definition} in the last {window_days} days")]
    NoUsableBuild { definition: String, window_days: u32 },

    /// No version manifest for a module
    #[error("No version manifest for module {module} in {dir}")]
    ManifestNotFound { module: String, dir: PathBuf },

    /// Manifest does not declare a version
    #[error("Manifest {path} has no {field} element")]
    ManifestVersionMissing { path: PathBuf, field: String },

    /// Manifest is not well-formed markup
    #[error("Failed to parse manifest {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// History of a module's manifest could not be searched
    ///
    /// Only ends the run when raised outside module pinning; the
    /// orchestrator skips the module instead.
    #[error("Could not search the history of {path} for module {module}: {source}")]
    HistorySearch {
        module: String,
        path: ServerPath,
        #[source]
        source: switch_vcs::Error,
    },

    /// Logging could not be initialised
    #[error("Failed to initialise logging: {message}")]
    Logging { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from switch-fs
    #[error(transparent)]
    Fs(#[from] switch_fs::Error),

    /// Version-control error from switch-vcs
    #[error(transparent)]
    Vcs(#[from] switch_vcs::Error),

    /// Build-system error from switch-build
    #[error(transparent)]
    Build(#[from] switch_build::Error),

    /// Mirror error from switch-mirror
    #[error(transparent)]
    Mirror(#[from] switch_mirror::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
