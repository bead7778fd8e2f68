//! Git-backed [`VersionControl`] implementation
//!
//! The repository plays the role of the version-control server: server
//! paths map onto tree paths below the repository root and commit ids are the
//! revision tokens. Workspaces are plain directories carrying a
//! `.switchws/workspace.toml` with their mappings.

mod checkout;
mod log;

use std::fs;
use std::path::Path;

use git2::{Commit, Oid, Repository};

use crate::{
    Error, FetchOptions, HistoryQuery, Result, RevisionEntry, RevisionSpec, RevisionToken,
    ServerPath, SyncResult, VersionControl, WorkingFolder, Workspace,
};

/// A git repository acting as a version-control server.
pub struct GitDepot {
    repo: Repository,
}

impl GitDepot {
    /// Open the repository at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Repository::open(path.as_ref())?;
        Ok(Self { repo })
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    fn resolve_commit(&self, revision: &RevisionSpec) -> Result<Commit<'_>> {
        match revision {
            RevisionSpec::Latest => Ok(self.repo.head()?.peel_to_commit()?),
            RevisionSpec::Changeset(token) => self.resolve_token(token),
        }
    }

    fn resolve_token(&self, token: &RevisionToken) -> Result<Commit<'_>> {
        self.repo
            .revparse_single(token.as_str())
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|_| Error::RevisionNotFound {
                revision: token.to_string(),
            })
    }

    fn resolve_oid(&self, token: &RevisionToken) -> Result<Oid> {
        Ok(self.resolve_token(token)?.id())
    }
}

impl VersionControl for GitDepot {
    fn get_workspace(&self, local_path: &Path) -> Result<Workspace> {
        Workspace::load(local_path)
    }

    fn create_workspace(&self, workspace: Workspace) -> Result<Workspace> {
        if Workspace::metadata_path(&workspace.root).is_file() {
            return Err(Error::WorkspaceExists {
                name: workspace.name.clone(),
                path: workspace.root.clone(),
            });
        }
        fs::create_dir_all(&workspace.root)
            .map_err(|e| switch_fs::Error::io(&workspace.root, e))?;
        workspace.save()?;
        tracing::info!(
            name = %workspace.name,
            root = %workspace.root.display(),
            "Created workspace"
        );
        Ok(workspace)
    }

    fn create_mapping(&self, workspace: &mut Workspace, folder: WorkingFolder) -> Result<()> {
        tracing::debug!(
            server = %folder.server,
            local = %folder.local.display(),
            "Mapping working folder"
        );
        workspace.add_mapping(folder);
        workspace.save()
    }

    fn fetch(
        &self,
        workspace: &Workspace,
        paths: &[ServerPath],
        revision: &RevisionSpec,
        options: FetchOptions,
    ) -> Result<SyncResult> {
        let commit = self.resolve_commit(revision)?;
        let tree = commit.tree()?;

        let mut result = SyncResult::default();
        for path in paths {
            let Some(local) = workspace.local_path_for(path) else {
                tracing::warn!(path = %path, "No mapping exists for item, skipping");
                result.failures += 1;
                continue;
            };
            checkout::materialize(&self.repo, &tree, path, &local, options, &mut result)?;
        }
        Ok(result)
    }

    fn query_history(&self, path: &ServerPath, query: &HistoryQuery) -> Result<Vec<RevisionEntry>> {
        let tip = self.resolve_commit(&query.to)?;
        let floor = query
            .from
            .as_ref()
            .map(|token| self.resolve_oid(token))
            .transpose()?;
        log::item_history(&self.repo, &tip, path, floor, query.max_results)
    }

    fn item_content(&self, path: &ServerPath, revision: &RevisionToken) -> Result<Vec<u8>> {
        let commit = self.resolve_token(revision)?;
        let entry = commit
            .tree()?
            .get_path(Path::new(path.relative()))
            .map_err(|_| Error::ItemNotFound {
                path: path.to_string(),
                revision: revision.to_string(),
            })?;
        let blob = self
            .repo
            .find_blob(entry.id())
            .map_err(|_| Error::NotAFile {
                path: path.to_string(),
            })?;
        Ok(blob.content().to_vec())
    }
}
