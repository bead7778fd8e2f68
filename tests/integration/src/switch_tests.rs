//! End-to-end switch against a git depot and a drop folder.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use switch_build::{BuildStatus, DropBuildServer};
use switch_core::{AssumeYes, ModuleOutcome, SwitchConfig, SyncOrchestrator, SyncRequest};
use switch_test_utils::build::{candidate, create_artifacts, day, write_record};
use switch_test_utils::git::{commit_file, real_git_repo_with_commit};
use switch_test_utils::mirror::CopyingLauncher;
use switch_vcs::{GitDepot, RevisionSpec, RevisionToken};
use tempfile::TempDir;

const DEF: &str = "Product.Main";
const BRANCH_MANIFEST: &str = "Product/Main/_Globals/VersionInformation/Imaging.xml";
const MODULE_MANIFEST: &str = "Product/Modules/Imaging/Main/_Globals/VersionInformation/Imaging.xml";
const MODULE_LIB: &str = "Product/Modules/Imaging/Main/lib.cs";

fn version(v: &str) -> String {
    format!("<Module><Name>Imaging</Name><Version>{v}</Version></Module>")
}

struct Product {
    _temp: TempDir,
    root: PathBuf,
    config: SwitchConfig,
    /// Commit the build was made from
    build_commit: String,
    /// Module manifest commit declaring 2.0.0
    module_commit: String,
}

impl Product {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        let depot = root.join("depot");
        fs::create_dir_all(&depot).unwrap();
        real_git_repo_with_commit(&depot);

        commit_file(&depot, MODULE_LIB, "v1", "Imaging lib v1");
        commit_file(&depot, MODULE_MANIFEST, &version("1.0.0"), "Imaging 1.0.0");
        commit_file(&depot, MODULE_LIB, "v2", "Imaging lib v2");
        let module_commit = commit_file(&depot, MODULE_MANIFEST, &version("2.0.0"), "Imaging 2.0.0");
        commit_file(&depot, "Tools/DeployedTools/tool.sh", "echo tool", "Tools");
        commit_file(&depot, BRANCH_MANIFEST, &version("2.0.0"), "Main uses Imaging 2.0.0");
        let build_commit = commit_file(&depot, "Product/Main/src/a.cs", "before", "Main source");
        commit_file(&depot, MODULE_LIB, "v3", "Imaging lib v3");
        commit_file(&depot, MODULE_MANIFEST, &version("2.1.0"), "Imaging 2.1.0");
        commit_file(&depot, "Product/Main/src/a.cs", "after", "Main source after build");

        let text = format!(
            r#"
server = "{depot}"
branch = "$/Product/Main"
workspace_root = "{work}"
build_definition = "{DEF}"
build_location = "{drops}"
modules = ["$/Product/Modules/Imaging/Main"]

[mirror]
poll_interval_secs = 0
window_secs = 0
"#,
            depot = depot.display(),
            work = root.join("work").display(),
            drops = root.join("drops").display(),
        );
        let config_path = root.join("switchws.toml");
        fs::write(&config_path, text).unwrap();
        let config = SwitchConfig::load(&config_path).unwrap();

        let mut build = candidate(
            "Product.Main_20240102.1",
            DEF,
            "2024-01-02",
            "18:00:00",
            BuildStatus::Succeeded,
        );
        build.source_version = build_commit.clone();
        create_artifacts(&config.artifact_layout(), &build, &["Product.dll", "x/Product.pdb"]);
        write_record(&root.join("drops"), &build);

        // A later build that failed must not be picked.
        let failed = candidate(
            "Product.Main_20240102.2",
            DEF,
            "2024-01-02",
            "22:00:00",
            BuildStatus::Failed,
        );
        create_artifacts(&config.artifact_layout(), &failed, &["Product.dll"]);
        write_record(&root.join("drops"), &failed);

        Self {
            _temp: temp,
            root,
            config,
            build_commit,
            module_commit,
        }
    }

    fn ws(&self) -> PathBuf {
        self.config.workspace_path("Temp").unwrap()
    }

    fn run(&self) -> switch_core::RunReport {
        let depot = GitDepot::open(&self.config.server).unwrap();
        let builds = DropBuildServer::new(&self.config.build_location);
        let request = SyncRequest {
            today: day("2024-01-04"),
            ..SyncRequest::new("Temp")
        };
        SyncOrchestrator::new(&self.config, &depot, &builds, &CopyingLauncher, &AssumeYes)
            .run(&request, &mut ())
            .unwrap()
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_switch_to_latest_usable_build() {
    let product = Product::new();
    let report = product.run();
    let ws = product.ws();

    assert_eq!(report.build.number, "Product.Main_20240102.1");
    assert_eq!(
        report.revision,
        RevisionSpec::Changeset(RevisionToken::new(product.build_commit.clone()))
    );
    assert!(report.workspace_created);

    // Branch sources are at the build's revision, not at the tip.
    assert_eq!(read(&ws.join("Main/src/a.cs")), "before");
    assert!(report.sources.unwrap().is_clean());

    let artifacts = product.config.artifact_target(&ws);
    assert!(artifacts.join("Product.dll").is_file());
    assert!(artifacts.join("x/Product.pdb").is_file());
    assert_eq!(report.mirror.unwrap().last_percent(), Some(100));

    assert!(ws.join("DeployedTools/tool.sh").is_file());

    // The module is pinned to the revision of its declared version.
    assert_eq!(report.modules.len(), 1);
    match &report.modules[0] {
        ModuleOutcome::Synced {
            module,
            version,
            revision,
            ..
        } => {
            assert_eq!(module, "Imaging");
            assert_eq!(version, "2.0.0");
            assert_eq!(revision.as_str(), product.module_commit);
        }
        other => panic!("module not synced: {other}"),
    }
    assert_eq!(read(&ws.join("Imaging/Main/lib.cs")), "v2");
}

#[test]
fn test_second_run_updates_in_place() {
    let product = Product::new();
    product.run();
    fs::write(product.ws().join("Main/src/a.cs"), "local edit").unwrap();

    let report = product.run();

    assert!(!report.workspace_created);
    let sources = report.sources.unwrap();
    assert_eq!(sources.updated, 1);
    assert!(sources.no_action_needed > 0);
    assert_eq!(read(&product.ws().join("Main/src/a.cs")), "before");

    // The destination already holds files, so progress is not estimated.
    let mirror = report.mirror.unwrap();
    assert!(!mirror.estimated);
    assert!(mirror.samples.is_empty());
    assert!(report.modules[0].is_synced());
}

#[test]
fn test_workspace_metadata_records_mappings() {
    let product = Product::new();
    product.run();

    let metadata = read(&product.ws().join(".switchws/workspace.toml"));
    assert!(metadata.contains("Created by switchws"));
    assert!(metadata.contains("$/Product/Modules/Imaging"));
    assert!(metadata.contains("$/Tools/DeployedTools"));
    assert!(product.root.join("depot/.git").is_dir());
}
