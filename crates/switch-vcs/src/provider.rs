//! The version-control seam used by the orchestration layer

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::{
    FetchOptions, Result, RevisionSpec, RevisionToken, ServerPath, SyncResult, WorkingFolder,
    Workspace,
};

/// Default number of history entries examined by a search.
pub const DEFAULT_HISTORY_RESULTS: usize = 20;

/// One entry of an item's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionEntry {
    pub token: RevisionToken,
    pub author: String,
    /// First line of the change comment
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

impl RevisionEntry {
    pub fn new(token: impl Into<RevisionToken>) -> Self {
        Self {
            token: token.into(),
            author: String::new(),
            comment: String::new(),
            timestamp: DateTime::<Utc>::default(),
        }
    }
}

/// Bounds of a history query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Oldest revision considered, inclusive; `None` means the start of history
    pub from: Option<RevisionToken>,
    /// Newest revision considered
    pub to: RevisionSpec,
    pub max_results: usize,
}

impl HistoryQuery {
    /// Query from `from` up to the latest revision.
    pub fn since(from: Option<RevisionToken>) -> Self {
        Self {
            from,
            ..Self::default()
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            from: None,
            to: RevisionSpec::Latest,
            max_results: DEFAULT_HISTORY_RESULTS,
        }
    }
}

/// Operations the sync workflow needs from a version-control system.
///
/// Implementations own connection details; callers only see workspaces,
/// server paths and revisions.
pub trait VersionControl {
    /// Find the workspace whose root is `local_path`.
    ///
    /// Fails with [`crate::Error::WorkspaceNotFound`] when none is mapped there.
    fn get_workspace(&self, local_path: &Path) -> Result<Workspace>;

    /// Register a new workspace with its initial mappings.
    fn create_workspace(&self, workspace: Workspace) -> Result<Workspace>;

    /// Add or replace a mapping on an existing workspace.
    fn create_mapping(&self, workspace: &mut Workspace, folder: WorkingFolder) -> Result<()>;

    /// Bring the local copies of `paths` to `revision`.
    fn fetch(
        &self,
        workspace: &Workspace,
        paths: &[ServerPath],
        revision: &RevisionSpec,
        options: FetchOptions,
    ) -> Result<SyncResult>;

    /// Revisions that changed `path`, newest first, bounded by `query`.
    fn query_history(&self, path: &ServerPath, query: &HistoryQuery) -> Result<Vec<RevisionEntry>>;

    /// Full content of `path` as of `revision`.
    fn item_content(&self, path: &ServerPath, revision: &RevisionToken) -> Result<Vec<u8>>;
}
