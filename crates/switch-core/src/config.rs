//! Run configuration
//!
//! Everything the tool needs to know about the product layout lives in one
//! [`SwitchConfig`], loaded once and passed to the components that need it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use switch_build::{ArtifactLayout, DEFAULT_WINDOW_DAYS};
use switch_fs::ConfigStore;
use switch_mirror::{MirrorTool, MonitorTiming, RetryPolicy};
use switch_vcs::{HistoryQuery, RevisionToken, ServerPath, provider::DEFAULT_HISTORY_RESULTS};

use crate::{Error, Result};

/// File name looked up when no configuration path is given.
pub const CONFIG_FILE_NAME: &str = "switchws.toml";

fn default_platform() -> String {
    "x64".to_string()
}

fn default_configuration() -> String {
    "Release".to_string()
}

fn default_modules_root() -> ServerPath {
    ServerPath::new("$/Product/Modules")
}

fn default_deployed_tools_path() -> ServerPath {
    ServerPath::new("$/Tools/DeployedTools")
}

fn default_version_info_dir() -> String {
    "_Globals/VersionInformation".to_string()
}

fn default_manifest_extension() -> String {
    "xml".to_string()
}

fn default_version_field() -> String {
    "Version".to_string()
}

fn default_history_max_results() -> usize {
    DEFAULT_HISTORY_RESULTS
}

fn default_build_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

/// How build artifacts are mirrored into the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorSettings {
    pub tool: MirrorTool,
    pub retries: u32,
    pub retry_wait_secs: u32,
    pub poll_interval_secs: u64,
    pub window_secs: u64,
    pub max_wait_secs: Option<u64>,
}

impl Default for MirrorSettings {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        let timing = MonitorTiming::default();
        Self {
            tool: MirrorTool::default(),
            retries: retry.retries,
            retry_wait_secs: retry.wait_secs,
            poll_interval_secs: timing.poll_interval.as_secs(),
            window_secs: timing.window.as_secs(),
            max_wait_secs: None,
        }
    }
}

impl MirrorSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries,
            wait_secs: self.retry_wait_secs,
        }
    }

    pub fn timing(&self) -> MonitorTiming {
        MonitorTiming {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            window: Duration::from_secs(self.window_secs),
            max_wait: self.max_wait_secs.map(Duration::from_secs),
        }
    }
}

/// Configuration of a switchws run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchConfig {
    /// Append-only log file; console only when unset
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Version-control server address
    pub server: String,

    /// Full server path of the branch, e.g. `$/Product/Main`
    pub branch: ServerPath,

    /// Directory holding the local workspaces
    pub workspace_root: PathBuf,

    /// Build definition; selected build numbers must contain it
    pub build_definition: String,

    /// Drop root holding `<build>/<platform>/<configuration>`
    pub build_location: PathBuf,

    #[serde(default = "default_platform")]
    pub platform: String,

    #[serde(default = "default_configuration")]
    pub configuration: String,

    /// Bundles below the branch to fetch; the whole branch when empty
    #[serde(default)]
    pub bundles: Vec<String>,

    /// Server paths of the modules to pin, below `modules_root`
    #[serde(default)]
    pub modules: Vec<ServerPath>,

    #[serde(default = "default_modules_root")]
    pub modules_root: ServerPath,

    /// Fetched at the latest revision before any module
    #[serde(default = "default_deployed_tools_path")]
    pub deployed_tools_path: ServerPath,

    /// Manifest directory, relative to the branch and to each module
    #[serde(default = "default_version_info_dir")]
    pub version_info_dir: String,

    #[serde(default = "default_manifest_extension")]
    pub manifest_extension: String,

    /// Manifest element carrying the module version
    #[serde(default = "default_version_field")]
    pub version_field: String,

    /// Oldest revision considered when searching manifest history
    #[serde(default)]
    pub history_floor: Option<RevisionToken>,

    #[serde(default = "default_history_max_results")]
    pub history_max_results: usize,

    #[serde(default = "default_build_window_days")]
    pub build_window_days: u32,

    #[serde(default)]
    pub mirror: MirrorSettings,
}

impl SwitchConfig {
    /// Load and validate the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = ConfigStore::new().load(path)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Locations searched for the configuration, in order.
    ///
    /// An explicit path is the only candidate. Otherwise the working
    /// directory is searched first, then the user configuration directory.
    pub fn candidate_paths(explicit: Option<&Path>, cwd: &Path) -> Vec<PathBuf> {
        if let Some(path) = explicit {
            return vec![path.to_path_buf()];
        }
        let mut paths = vec![cwd.join(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("switchws").join(CONFIG_FILE_NAME));
        }
        paths
    }

    /// Load the first existing configuration among [`Self::candidate_paths`].
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let searched = Self::candidate_paths(explicit, cwd);
        match searched.iter().find(|p| p.is_file()) {
            Some(path) => Self::load(path),
            None => Err(Error::ConfigNotFound { searched }),
        }
    }

    /// Reject configurations the run cannot work with.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("server", self.server.as_str()),
            ("build_definition", self.build_definition.as_str()),
            ("platform", self.platform.as_str()),
            ("configuration", self.configuration.as_str()),
            ("version_field", self.version_field.as_str()),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(Error::invalid_config(format!("'{key}' must not be empty")));
            }
        }
        if self.branch.is_root() {
            return Err(Error::invalid_config("'branch' must name a branch below $/"));
        }
        if self.workspace_root.as_os_str().is_empty() {
            return Err(Error::invalid_config("'workspace_root' must not be empty"));
        }
        if self.build_location.as_os_str().is_empty() {
            return Err(Error::invalid_config("'build_location' must not be empty"));
        }
        if self.build_window_days == 0 {
            return Err(Error::invalid_config("'build_window_days' must be at least 1"));
        }
        if self.history_max_results == 0 {
            return Err(Error::invalid_config(
                "'history_max_results' must be at least 1",
            ));
        }
        if self.deployed_tools_path.is_root() {
            return Err(Error::invalid_config(
                "'deployed_tools_path' must name a folder below $/",
            ));
        }
        if let Some(bundle) = self.bundles.iter().find(|b| b.trim().is_empty()) {
            return Err(Error::invalid_config(format!(
                "bundle name '{bundle}' must not be empty"
            )));
        }
        for module in &self.modules {
            if self.module_name(module).is_none() {
                return Err(Error::invalid_config(format!(
                    "module {module} is not below {}",
                    self.modules_root
                )));
            }
        }
        Ok(())
    }

    /// Last segment of the branch path.
    pub fn branch_name(&self) -> &str {
        self.branch.name().unwrap_or_default()
    }

    /// Server path mapped onto the workspace root.
    pub fn branch_parent(&self) -> ServerPath {
        self.branch.parent().unwrap_or_else(ServerPath::root)
    }

    /// Local directory of the workspace called `name`.
    pub fn workspace_path(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.trim().is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if !valid {
            return Err(Error::InvalidWorkspaceName {
                name: name.to_string(),
            });
        }
        Ok(self.workspace_root.join(name))
    }

    /// Local directory of the branch inside a workspace.
    pub fn branch_dir(&self, workspace: &Path) -> PathBuf {
        workspace.join(self.branch_name())
    }

    /// Where build artifacts are mirrored inside a workspace.
    pub fn artifact_target(&self, workspace: &Path) -> PathBuf {
        self.branch_dir(workspace)
            .join("bin")
            .join(&self.platform)
            .join(&self.configuration)
    }

    /// Local directory of the deployed tools inside a workspace.
    pub fn deployed_tools_dir(&self, workspace: &Path) -> PathBuf {
        workspace.join(self.deployed_tools_path.name().unwrap_or_default())
    }

    /// Local directory holding the version manifests of the branch.
    pub fn version_info_dir(&self, workspace: &Path) -> PathBuf {
        self.version_info_dir
            .split(['/', '\\'])
            .filter(|s| !s.is_empty())
            .fold(self.branch_dir(workspace), |acc, seg| acc.join(seg))
    }

    /// Server paths fetched for the branch sources.
    pub fn bundle_paths(&self) -> Vec<ServerPath> {
        if self.bundles.is_empty() {
            return vec![self.branch.clone()];
        }
        self.bundles
            .iter()
            .map(|bundle| self.branch.join(bundle.trim()))
            .collect()
    }

    /// Module name of a configured module path: its first segment below
    /// `modules_root`.
    pub fn module_name<'a>(&self, module: &'a ServerPath) -> Option<&'a str> {
        module
            .strip_prefix(&self.modules_root)?
            .split('/')
            .find(|s| !s.is_empty())
    }

    pub fn artifact_layout(&self) -> ArtifactLayout {
        ArtifactLayout::new(&self.build_location, &self.platform, &self.configuration)
    }

    /// History window searched for module manifests.
    pub fn history_query(&self) -> HistoryQuery {
        HistoryQuery::since(self.history_floor.clone()).with_max_results(self.history_max_results)
    }
}
