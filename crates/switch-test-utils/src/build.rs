//! Build-server fakes and drop-folder builders.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use switch_build::drop_server::BUILD_RECORD;
use switch_build::{
    ArtifactLayout, BuildCandidate, BuildServer, BuildStatus, FinishWindow, Result,
};

/// Build a candidate finishing on `date` (`YYYY-MM-DD`) at `time` (`HH:MM:SS`).
///
/// # Panics
/// Panics on malformed dates.
pub fn candidate(
    number: &str,
    definition: &str,
    date: &str,
    time: &str,
    status: BuildStatus,
) -> BuildCandidate {
    let finish_time = NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|e| panic!("bad finish time {date} {time}: {e}"));
    BuildCandidate {
        number: number.to_string(),
        definition: definition.to_string(),
        finish_time,
        status,
        source_version: "C1".to_string(),
    }
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Panics
/// Panics on malformed dates.
pub fn day(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap_or_else(|e| panic!("bad date {date}: {e}"))
}

/// Build server answering from a fixed list, in the list's order.
///
/// The list order stands in for the server's listing order, so tests
/// control exactly what "later in the day's listing" means.
#[derive(Debug, Default)]
pub struct FakeBuildServer {
    builds: Vec<BuildCandidate>,
    queries: Mutex<Vec<FinishWindow>>,
}

impl FakeBuildServer {
    pub fn new(builds: Vec<BuildCandidate>) -> Self {
        Self {
            builds,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Windows queried so far, in order.
    pub fn queries(&self) -> Vec<FinishWindow> {
        self.queries.lock().unwrap().clone()
    }
}

impl BuildServer for FakeBuildServer {
    fn query_builds(&self, definition: &str, window: &FinishWindow) -> Result<Vec<BuildCandidate>> {
        self.queries.lock().unwrap().push(*window);
        Ok(self
            .builds
            .iter()
            .filter(|b| b.definition == definition && window.contains(b.finish_time))
            .cloned()
            .collect())
    }

    fn get_build(&self, definition: &str, number: &str) -> Result<Option<BuildCandidate>> {
        Ok(self
            .builds
            .iter()
            .find(|b| b.definition == definition && b.number == number)
            .cloned())
    }
}

/// Create the artifact directory of `build` under `layout` with `files`.
///
/// Returns the artifact directory.
pub fn create_artifacts(layout: &ArtifactLayout, build: &BuildCandidate, files: &[&str]) -> PathBuf {
    let dir = build.artifact_dir(layout);
    fs::create_dir_all(&dir).unwrap();
    for file in files {
        let target = dir.join(file);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&target, format!("artifact {file}")).unwrap();
    }
    dir
}

/// Write the `build.json` record of `build` into the drop folder at `root`.
pub fn write_record(root: &Path, build: &BuildCandidate) {
    let dir = root.join(&build.number);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(BUILD_RECORD),
        serde_json::to_string_pretty(build).unwrap(),
    )
    .unwrap();
}
