//! In-memory [`VersionControl`] fake.
//!
//! Records every fetch, history query and content download so tests can
//! assert on call order and on what was *not* downloaded.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use switch_vcs::{
    Error, FetchOptions, HistoryQuery, Result, RevisionEntry, RevisionSpec, RevisionToken,
    ServerPath, SyncResult, VersionControl, WorkingFolder, Workspace,
};

/// A recorded fetch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub paths: Vec<ServerPath>,
    pub revision: RevisionSpec,
    pub options: FetchOptions,
}

/// In-memory version control.
#[derive(Debug, Default)]
pub struct FakeVersionControl {
    workspaces: Mutex<HashMap<PathBuf, Workspace>>,
    /// Files written into mapped folders on fetch
    files: Mutex<Vec<(ServerPath, String)>>,
    /// History per item, newest first, with the item content at each revision
    history: Mutex<HashMap<ServerPath, Vec<(RevisionToken, String)>>>,
    fetches: Mutex<Vec<FetchCall>>,
    history_queries: Mutex<Vec<(ServerPath, HistoryQuery)>>,
    downloads: Mutex<Vec<(ServerPath, RevisionToken)>>,
    /// Items whose content downloads fail
    unreadable: Mutex<Vec<ServerPath>>,
}

impl FakeVersionControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register a workspace so `get_workspace` finds it.
    pub fn with_workspace(self, workspace: Workspace) -> Self {
        self.workspaces
            .lock()
            .unwrap()
            .insert(workspace.root.clone(), workspace);
        self
    }

    /// Serve `content` for `path`; fetches covering it write it locally.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .push((ServerPath::new(path), content.to_string()));
        self
    }

    /// History of `path`, newest first, as `(revision, content)` pairs.
    pub fn with_history(self, path: &str, revisions: &[(&str, &str)]) -> Self {
        self.history.lock().unwrap().insert(
            ServerPath::new(path),
            revisions
                .iter()
                .map(|(rev, content)| (RevisionToken::new(*rev), content.to_string()))
                .collect(),
        );
        self
    }

    /// Make every content download of `path` fail.
    pub fn with_unreadable(self, path: &str) -> Self {
        self.unreadable.lock().unwrap().push(ServerPath::new(path));
        self
    }

    pub fn fetches(&self) -> Vec<FetchCall> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn history_queries(&self) -> Vec<(ServerPath, HistoryQuery)> {
        self.history_queries.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> Vec<(ServerPath, RevisionToken)> {
        self.downloads.lock().unwrap().clone()
    }

    pub fn workspace_at(&self, root: &Path) -> Option<Workspace> {
        self.workspaces.lock().unwrap().get(root).cloned()
    }
}

impl VersionControl for FakeVersionControl {
    fn get_workspace(&self, local_path: &Path) -> Result<Workspace> {
        self.workspace_at(local_path)
            .ok_or_else(|| Error::WorkspaceNotFound {
                path: local_path.to_path_buf(),
            })
    }

    fn create_workspace(&self, workspace: Workspace) -> Result<Workspace> {
        self.workspaces
            .lock()
            .unwrap()
            .insert(workspace.root.clone(), workspace.clone());
        Ok(workspace)
    }

    fn create_mapping(&self, workspace: &mut Workspace, folder: WorkingFolder) -> Result<()> {
        workspace.add_mapping(folder);
        self.workspaces
            .lock()
            .unwrap()
            .insert(workspace.root.clone(), workspace.clone());
        Ok(())
    }

    fn fetch(
        &self,
        workspace: &Workspace,
        paths: &[ServerPath],
        revision: &RevisionSpec,
        options: FetchOptions,
    ) -> Result<SyncResult> {
        self.fetches.lock().unwrap().push(FetchCall {
            paths: paths.to_vec(),
            revision: revision.clone(),
            options,
        });

        let mut result = SyncResult::default();
        for (file, content) in self.files.lock().unwrap().iter() {
            if !paths.iter().any(|p| file.starts_with(p)) {
                continue;
            }
            result.operations += 1;
            match workspace.local_path_for(file) {
                Some(local) => {
                    if let Some(parent) = local.parent() {
                        fs::create_dir_all(parent).unwrap();
                    }
                    fs::write(&local, content).unwrap();
                    result.updated += 1;
                }
                None => result.failures += 1,
            }
        }
        Ok(result)
    }

    fn query_history(&self, path: &ServerPath, query: &HistoryQuery) -> Result<Vec<RevisionEntry>> {
        self.history_queries
            .lock()
            .unwrap()
            .push((path.clone(), query.clone()));

        Ok(self
            .history
            .lock()
            .unwrap()
            .get(path)
            .map(|revs| {
                revs.iter()
                    .take(query.max_results)
                    .map(|(token, _)| RevisionEntry::new(token.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn item_content(&self, path: &ServerPath, revision: &RevisionToken) -> Result<Vec<u8>> {
        self.downloads
            .lock()
            .unwrap()
            .push((path.clone(), revision.clone()));

        if self.unreadable.lock().unwrap().contains(path) {
            return Err(Error::RevisionNotFound {
                revision: revision.to_string(),
            });
        }

        self.history
            .lock()
            .unwrap()
            .get(path)
            .and_then(|revs| revs.iter().find(|(token, _)| token == revision))
            .map(|(_, content)| content.clone().into_bytes())
            .ok_or_else(|| Error::ItemNotFound {
                path: path.to_string(),
                revision: revision.to_string(),
            })
    }
}
