//! Build server backed by a drop folder
//!
//! Every build is a directory below the drop root carrying a `build.json`
//! record next to its per-platform outputs:
//!
//! ```text
//! <drop_root>/Product.Main_20240101.1/build.json
//! <drop_root>/Product.Main_20240101.1/x64/Release/...
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::{BuildCandidate, BuildServer, Error, FinishWindow, Result};

/// File name of the per-build record.
pub const BUILD_RECORD: &str = "build.json";

/// Reads build records from a drop folder.
#[derive(Debug, Clone)]
pub struct DropBuildServer {
    root: PathBuf,
}

impl DropBuildServer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_record(path: &Path) -> Result<BuildCandidate> {
        let content = switch_fs::io::read_text(path)?;
        serde_json::from_str(&content).map_err(|e| Error::InvalidRecord {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn records(&self) -> Result<Vec<BuildCandidate>> {
        if !self.root.is_dir() {
            return Err(Error::DropRootMissing {
                path: self.root.clone(),
            });
        }

        let entries =
            fs::read_dir(&self.root).map_err(|e| switch_fs::Error::io(&self.root, e))?;

        let mut records = Vec::new();
        for entry in entries.flatten() {
            let record_path = entry.path().join(BUILD_RECORD);
            if !record_path.is_file() {
                continue;
            }
            match Self::read_record(&record_path) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(error = %e, "Skipping unreadable build record"),
            }
        }
        Ok(records)
    }
}

impl BuildServer for DropBuildServer {
    fn query_builds(&self, definition: &str, window: &FinishWindow) -> Result<Vec<BuildCandidate>> {
        let mut builds: Vec<BuildCandidate> = self
            .records()?
            .into_iter()
            .filter(|b| b.definition == definition && window.contains(b.finish_time))
            .collect();
        builds.sort_by(|a, b| {
            a.finish_time
                .cmp(&b.finish_time)
                .then_with(|| a.number.cmp(&b.number))
        });
        Ok(builds)
    }

    fn get_build(&self, definition: &str, number: &str) -> Result<Option<BuildCandidate>> {
        let record_path = self.root.join(number).join(BUILD_RECORD);
        if !record_path.is_file() {
            return Ok(None);
        }
        let record = Self::read_record(&record_path)?;
        Ok((record.definition == definition).then_some(record))
    }
}
