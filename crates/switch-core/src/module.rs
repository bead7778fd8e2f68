//! Pinning modules to the version the branch declares
//!
//! The branch carries one version manifest per module. A module is pinned
//! by finding the revision of the module's own manifest that contains the
//! version the branch declares, then fetching the module at that revision.

use std::fs;
use std::path::{Path, PathBuf};

use switch_vcs::{HistoryQuery, HistorySearcher, RevisionToken, ServerPath, VersionControl};

use crate::{Error, Result, SwitchConfig};

/// One configured module and what has been resolved about it so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub name: String,
    /// Server path of the module, e.g. `$/Product/Modules/Imaging/Main`
    pub server_path: ServerPath,
    /// Local directory the module's name folder is mapped to
    pub local_root: PathBuf,
    /// Branch-side manifest the version was read from
    pub manifest: Option<PathBuf>,
    /// Version declared by the manifest
    pub version: Option<String>,
    revision: Option<RevisionToken>,
}

impl ModuleDescriptor {
    /// Describe `server_path` for the workspace at `workspace`.
    pub fn new(config: &SwitchConfig, server_path: &ServerPath, workspace: &Path) -> Result<Self> {
        let name = config.module_name(server_path).ok_or_else(|| {
            Error::invalid_config(format!(
                "module {server_path} is not below {}",
                config.modules_root
            ))
        })?;
        Ok(Self {
            name: name.to_string(),
            server_path: server_path.clone(),
            local_root: workspace.join(name),
            manifest: None,
            version: None,
            revision: None,
        })
    }

    /// Server folder mapped onto [`Self::local_root`].
    pub fn mapping_root(&self, config: &SwitchConfig) -> ServerPath {
        config.modules_root.join(&self.name)
    }

    pub fn revision(&self) -> Option<&RevisionToken> {
        self.revision.as_ref()
    }

    /// Record the resolved revision. A revision already set is kept.
    fn set_revision(&mut self, revision: RevisionToken) -> &RevisionToken {
        self.revision.get_or_insert(revision)
    }
}

/// Locate the manifest of `module` in `dir`.
///
/// Candidates are files whose name contains the module name and whose
/// extension is `extension`; the first by file name wins.
pub fn find_manifest(dir: &Path, module: &str, extension: &str) -> Result<PathBuf> {
    let not_found = || Error::ManifestNotFound {
        module: module.to_string(),
        dir: dir.to_path_buf(),
    };

    let entries = fs::read_dir(dir).map_err(|_| not_found())?;
    let mut candidates: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            let name_matches = p
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(module));
            let ext_matches = p
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension));
            name_matches && ext_matches
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next().ok_or_else(not_found)
}

/// Text of the first `field` element of the manifest at `path`.
pub fn read_declared_version(path: &Path, field: &str) -> Result<String> {
    let content = switch_fs::io::read_text(path)?;
    let doc = roxmltree::Document::parse(&content).map_err(|e| Error::ManifestParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    doc.descendants()
        .find(|n| n.has_tag_name(field))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::ManifestVersionMissing {
            path: path.to_path_buf(),
            field: field.to_string(),
        })
}

/// Resolves modules to the revision carrying their declared version.
pub struct ModuleVersionResolver<'a> {
    config: &'a SwitchConfig,
    searcher: HistorySearcher<'a>,
    query: HistoryQuery,
}

impl<'a> ModuleVersionResolver<'a> {
    pub fn new(config: &'a SwitchConfig, vcs: &'a dyn VersionControl) -> Self {
        Self {
            config,
            searcher: HistorySearcher::new(vcs),
            query: config.history_query(),
        }
    }

    /// Resolve `module` using the manifests of the branch in `workspace`.
    ///
    /// A missing manifest or version element is an error. A declared version
    /// that appears in none of the searched revisions yields `Ok(None)`, and
    /// a failing history search yields [`Error::HistorySearch`]. A
    /// module that already has a revision is not resolved again.
    pub fn resolve(
        &self,
        module: &mut ModuleDescriptor,
        workspace: &Path,
    ) -> Result<Option<RevisionToken>> {
        if let Some(revision) = module.revision() {
            return Ok(Some(revision.clone()));
        }

        let manifest = find_manifest(
            &self.config.version_info_dir(workspace),
            &module.name,
            &self.config.manifest_extension,
        )?;
        let version = read_declared_version(&manifest, &self.config.version_field)?;
        tracing::debug!(
            module = %module.name,
            manifest = %manifest.display(),
            %version,
            "Read declared module version"
        );

        let file_name = manifest
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let history_path = module
            .server_path
            .join(&self.config.version_info_dir)
            .join(file_name);

        module.manifest = Some(manifest.clone());
        module.version = Some(version.clone());

        let found = self
            .searcher
            .find_changeset_introducing(&history_path, &version, &self.query)
            .map_err(|source| Error::HistorySearch {
                module: module.name.clone(),
                path: history_path.clone(),
                source,
            })?;
        Ok(found.map(|revision| module.set_revision(revision).clone()))
    }
}
