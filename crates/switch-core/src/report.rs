//! What a run did

use std::fmt;
use std::path::PathBuf;

use switch_build::BuildCandidate;
use switch_mirror::MirrorReport;
use switch_vcs::{RevisionSpec, RevisionToken, SyncResult};

/// Result of pinning one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleOutcome {
    /// Module fetched at the revision carrying its declared version
    Synced {
        module: String,
        version: String,
        revision: RevisionToken,
        result: SyncResult,
    },
    /// Module left alone; other modules were still processed
    Skipped { module: String, reason: String },
}

impl ModuleOutcome {
    pub fn module(&self) -> &str {
        match self {
            Self::Synced { module, .. } | Self::Skipped { module, .. } => module,
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, Self::Synced { .. })
    }
}

impl fmt::Display for ModuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Synced {
                module,
                version,
                revision,
                ..
            } => write!(f, "{module} {version} at changeset {revision}"),
            Self::Skipped { module, reason } => write!(f, "{module} skipped: {reason}"),
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub build: BuildCandidate,
    /// Revision the branch sources were taken at
    pub revision: RevisionSpec,
    pub workspace: PathBuf,
    pub workspace_created: bool,
    /// Branch sources fetch, absent in modules-only mode
    pub sources: Option<SyncResult>,
    /// Artifact mirror, absent in modules-only mode
    pub mirror: Option<MirrorReport>,
    /// Deployed tools fetch, absent when no modules are configured
    pub tools: Option<SyncResult>,
    pub modules: Vec<ModuleOutcome>,
}

impl RunReport {
    pub fn skipped_modules(&self) -> impl Iterator<Item = &ModuleOutcome> {
        self.modules.iter().filter(|m| !m.is_synced())
    }

    /// Whether the artifact mirror ran and the tool reported failure.
    pub fn mirror_failed(&self) -> bool {
        self.mirror.as_ref().is_some_and(|m| !m.outcome.success)
    }
}
