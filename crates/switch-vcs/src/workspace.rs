//! Workspaces: named sets of server-to-local mappings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use switch_fs::ConfigStore;

use crate::{Error, Result, ServerPath};

/// Directory holding workspace metadata, relative to the workspace root.
pub const WORKSPACE_DIR: &str = ".switchws";
/// Workspace metadata file name.
pub const WORKSPACE_FILE: &str = "workspace.toml";

/// A mapping between a server path and a local directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingFolder {
    pub server: ServerPath,
    pub local: PathBuf,
}

impl WorkingFolder {
    pub fn new(server: impl Into<ServerPath>, local: impl Into<PathBuf>) -> Self {
        Self {
            server: server.into(),
            local: local.into(),
        }
    }
}

/// A local workspace and its mappings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub comment: String,
    /// Local directory the workspace lives in
    #[serde(skip)]
    pub root: PathBuf,
    #[serde(default, rename = "mapping")]
    pub folders: Vec<WorkingFolder>,
}

impl Workspace {
    pub fn new(
        name: impl Into<String>,
        owner: impl Into<String>,
        comment: impl Into<String>,
        root: impl Into<PathBuf>,
        folders: Vec<WorkingFolder>,
    ) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            comment: comment.into(),
            root: root.into(),
            folders,
        }
    }

    /// Add a mapping, replacing any existing mapping of the same server path.
    pub fn add_mapping(&mut self, folder: WorkingFolder) {
        if let Some(existing) = self.folders.iter_mut().find(|f| f.server == folder.server) {
            existing.local = folder.local;
        } else {
            self.folders.push(folder);
        }
    }

    /// Resolve a server path to its local path.
    ///
    /// The mapping with the longest matching server prefix wins.
    pub fn local_path_for(&self, server: &ServerPath) -> Option<PathBuf> {
        self.folders
            .iter()
            .filter_map(|f| server.strip_prefix(&f.server).map(|rest| (f, rest)))
            .max_by_key(|(f, _)| f.server.as_str().len())
            .map(|(f, rest)| {
                rest.split('/')
                    .filter(|s| !s.is_empty())
                    .fold(f.local.clone(), |acc, seg| acc.join(seg))
            })
    }

    /// Path of the metadata file for a workspace rooted at `root`.
    pub fn metadata_path(root: &Path) -> PathBuf {
        root.join(WORKSPACE_DIR).join(WORKSPACE_FILE)
    }

    /// Load the workspace whose root is `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::metadata_path(root);
        if !path.is_file() {
            return Err(Error::WorkspaceNotFound {
                path: root.to_path_buf(),
            });
        }
        let mut workspace: Workspace = ConfigStore::new().load(&path)?;
        workspace.root = root.to_path_buf();
        Ok(workspace)
    }

    /// Persist the workspace metadata under its root.
    pub fn save(&self) -> Result<()> {
        ConfigStore::new().save(&Self::metadata_path(&self.root), self)?;
        Ok(())
    }
}
