//! The end-to-end switch of a workspace to a build

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use switch_build::{BuildCandidate, BuildSelector, BuildServer};
use switch_mirror::{CopyProgressMonitor, MirrorLauncher, ProgressSink};
use switch_vcs::{
    Error as VcsError, FetchOptions, RevisionSpec, ServerPath, SyncResult, VersionControl,
    WorkingFolder, Workspace,
};

use crate::module::{ModuleDescriptor, ModuleVersionResolver};
use crate::{Error, ModuleOutcome, Result, RunReport, SwitchConfig};

/// Comment recorded on workspaces created by the tool.
pub const WORKSPACE_COMMENT: &str = "Created by switchws";

/// A workspace about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePlan {
    pub name: String,
    pub owner: String,
    pub server: ServerPath,
    pub local: PathBuf,
}

impl fmt::Display for WorkspacePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "create workspace {} mapping {} -> {}",
            self.name,
            self.server,
            self.local.display()
        )
    }
}

/// Asks whether a missing workspace should be created.
pub trait WorkspaceConfirm {
    fn confirm_create(&self, plan: &WorkspacePlan) -> io::Result<bool>;
}

/// Accepts every workspace plan without asking.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl WorkspaceConfirm for AssumeYes {
    fn confirm_create(&self, _plan: &WorkspacePlan) -> io::Result<bool> {
        Ok(true)
    }
}

/// Parameters of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    /// Workspace name below the workspace root
    pub workspace: String,
    /// Explicit build number; the newest usable build when absent
    pub build: Option<String>,
    /// Only pin modules, leaving branch sources and artifacts alone
    pub modules_only: bool,
    /// Day the build scan starts from
    pub today: NaiveDate,
}

impl SyncRequest {
    pub fn new(workspace: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            build: None,
            modules_only: false,
            today: Local::now().date_naive(),
        }
    }
}

/// Collaborators of a run.
pub struct SyncOrchestrator<'a> {
    config: &'a SwitchConfig,
    vcs: &'a dyn VersionControl,
    builds: &'a dyn BuildServer,
    launcher: &'a dyn MirrorLauncher,
    confirm: &'a dyn WorkspaceConfirm,
}

impl<'a> SyncOrchestrator<'a> {
    pub fn new(
        config: &'a SwitchConfig,
        vcs: &'a dyn VersionControl,
        builds: &'a dyn BuildServer,
        launcher: &'a dyn MirrorLauncher,
        confirm: &'a dyn WorkspaceConfirm,
    ) -> Self {
        Self {
            config,
            vcs,
            builds,
            launcher,
            confirm,
        }
    }

    /// Switch the requested workspace to a build.
    ///
    /// Build and workspace resolution happen before anything is fetched, so
    /// their failures leave the workspace untouched.
    pub fn run(&self, request: &SyncRequest, progress: &mut dyn ProgressSink) -> Result<RunReport> {
        tracing::info!("switchws started at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

        let workspace_path = self.config.workspace_path(&request.workspace)?;
        let build = self.resolve_build(request)?;
        let revision = RevisionSpec::parse(&build.source_version);
        tracing::info!("Found relevant changeset {}", revision);

        let (mut workspace, workspace_created) =
            self.open_workspace(&request.workspace, &workspace_path)?;

        let mut report = RunReport {
            build,
            revision,
            workspace: workspace_path,
            workspace_created,
            sources: None,
            mirror: None,
            tools: None,
            modules: Vec::new(),
        };

        if request.modules_only {
            tracing::info!("Modules only: branch sources and artifacts are left as they are");
        } else {
            report.sources = Some(self.fetch_sources(&workspace, &report.revision)?);

            let source = report.build.artifact_dir(&self.config.artifact_layout());
            let destination = self.config.artifact_target(&report.workspace);
            tracing::info!(
                source = %source.display(),
                destination = %destination.display(),
                "Downloading artifacts from drop folder..."
            );
            let mirror = CopyProgressMonitor::new(self.launcher)
                .with_timing(self.config.mirror.timing())
                .mirror_directory(&source, &destination, progress)?;
            report.mirror = Some(mirror);
        }

        if self.config.modules.is_empty() {
            tracing::info!("No modules configured, module update skipped");
        } else {
            report.tools = Some(self.fetch_deployed_tools(&mut workspace)?);
            report.modules = self.sync_modules(&mut workspace)?;
        }

        tracing::info!("switchws finished at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        Ok(report)
    }

    fn resolve_build(&self, request: &SyncRequest) -> Result<BuildCandidate> {
        let definition = &self.config.build_definition;
        let layout = self.config.artifact_layout();

        match &request.build {
            Some(number) => {
                let artifacts = layout.artifact_dir(number);
                if !artifacts.is_dir() {
                    return Err(Error::ArtifactsMissing {
                        build: number.clone(),
                        path: artifacts,
                    });
                }
                self.builds
                    .get_build(definition, number)?
                    .ok_or_else(|| Error::BuildNotFound {
                        build: number.clone(),
                    })
            }
            None => {
                tracing::info!("Looking for feasible build...");
                BuildSelector::new(self.builds, &layout)
                    .with_window_days(self.config.build_window_days)
                    .select(definition, request.today)?
                    .ok_or_else(|| Error::NoUsableBuild {
                        definition: definition.clone(),
                        window_days: self.config.build_window_days,
                    })
            }
        }
    }

    /// Existing workspace at `path`, or a newly created one if the user
    /// agrees. The flag tells whether it was created.
    fn open_workspace(&self, name: &str, path: &Path) -> Result<(Workspace, bool)> {
        match self.vcs.get_workspace(path) {
            Ok(workspace) => return Ok((workspace, false)),
            Err(VcsError::WorkspaceNotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }

        tracing::warn!("Can't find a workspace mapped at {}", path.display());
        let plan = WorkspacePlan {
            name: name.to_string(),
            owner: current_user(),
            server: self.config.branch_parent(),
            local: path.to_path_buf(),
        };
        if !self.confirm.confirm_create(&plan)? {
            return Err(Error::WorkspaceDeclined {
                path: path.to_path_buf(),
            });
        }

        let workspace = self.vcs.create_workspace(Workspace::new(
            plan.name,
            plan.owner,
            WORKSPACE_COMMENT,
            plan.local.clone(),
            vec![WorkingFolder::new(plan.server, plan.local)],
        ))?;
        Ok((workspace, true))
    }

    fn fetch_sources(&self, workspace: &Workspace, revision: &RevisionSpec) -> Result<SyncResult> {
        let paths = self.config.bundle_paths();
        if self.config.bundles.is_empty() {
            tracing::info!("Getting sources for all bundles");
        } else {
            tracing::info!("Getting sources for {} bundles", self.config.bundles.join(","));
        }

        let result = self
            .vcs
            .fetch(workspace, &paths, revision, FetchOptions::overwrite())?;
        log_sync_result(&result);
        Ok(result)
    }

    fn fetch_deployed_tools(&self, workspace: &mut Workspace) -> Result<SyncResult> {
        tracing::info!("Updating modules...");
        let tools = &self.config.deployed_tools_path;
        let local = self.config.deployed_tools_dir(&workspace.root);
        self.vcs
            .create_mapping(workspace, WorkingFolder::new(tools.clone(), local))?;
        let result = self.vcs.fetch(
            workspace,
            std::slice::from_ref(tools),
            &RevisionSpec::Latest,
            FetchOptions::overwrite(),
        )?;
        Ok(result)
    }

    /// Pin every configured module. A module whose version cannot be traced
    /// in history, or whose history cannot be searched, is skipped without
    /// affecting the others. Manifest problems end the run.
    fn sync_modules(&self, workspace: &mut Workspace) -> Result<Vec<ModuleOutcome>> {
        let resolver = ModuleVersionResolver::new(self.config, self.vcs);
        let mut outcomes = Vec::with_capacity(self.config.modules.len());

        for module_path in &self.config.modules {
            let mut module = ModuleDescriptor::new(self.config, module_path, &workspace.root)?;
            self.vcs.create_mapping(
                workspace,
                WorkingFolder::new(module.mapping_root(self.config), module.local_root.clone()),
            )?;

            let resolved = match resolver.resolve(&mut module, &workspace.root) {
                Ok(resolved) => resolved,
                Err(e @ Error::HistorySearch { .. }) => {
                    tracing::warn!(
                        error = %e,
                        "Found problem with getting the version of module {}, skipping it",
                        module.name
                    );
                    outcomes.push(ModuleOutcome::Skipped {
                        reason: e.to_string(),
                        module: module.name,
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };
            let Some(revision) = resolved else {
                tracing::warn!(
                    "Found problem with getting the version of module {}, skipping it",
                    module.name
                );
                outcomes.push(ModuleOutcome::Skipped {
                    reason: format!(
                        "version {} not found in the last {} revisions of its manifest",
                        module.version.as_deref().unwrap_or_default(),
                        self.config.history_max_results
                    ),
                    module: module.name,
                });
                continue;
            };

            let version = module.version.clone().unwrap_or_default();
            tracing::info!(
                "Found relevant changeset {} for module {} with version {}",
                revision,
                module.name,
                version
            );
            tracing::info!("Getting sources for module: {}", module.name);
            let result = self.vcs.fetch(
                workspace,
                std::slice::from_ref(&module.server_path),
                &RevisionSpec::Changeset(revision.clone()),
                FetchOptions::get_all(),
            )?;
            outcomes.push(ModuleOutcome::Synced {
                module: module.name,
                version,
                revision,
                result,
            });
        }
        Ok(outcomes)
    }
}

fn log_sync_result(result: &SyncResult) {
    tracing::info!("Result of getting sources:");
    tracing::info!("Number haveResolvableWarnings: {}", result.have_resolvable_warnings);
    tracing::info!("Number noActionNeeded        : {}", result.no_action_needed);
    tracing::info!("Number conflicts             : {}", result.conflicts);
    tracing::info!("Number failures              : {}", result.failures);
    tracing::info!("Number operations            : {}", result.operations);
    tracing::info!("Number updated               : {}", result.updated);
    tracing::info!("Number warnings              : {}", result.warnings);
}

fn current_user() -> String {
    ["USER", "USERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .or_else(|| {
            dirs::home_dir()
                .and_then(|home| home.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| "unknown".to_string())
}
