//! Errors reported by the `switchws` binary

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] switch_core::Error),

    /// Opening the git depot failed before the run started.
    #[error(transparent)]
    Vcs(#[from] switch_vcs::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("a workspace name is required (--ws <NAME>)")]
    WorkspaceRequired,
}
