//! Build records as reported by the build system

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Outcome of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildStatus {
    InProgress,
    PartiallySucceeded,
    Succeeded,
    Failed,
    Stopped,
}

impl BuildStatus {
    /// Whether artifacts of a build with this status are usable.
    pub fn is_successful(self) -> bool {
        matches!(self, Self::Succeeded | Self::PartiallySucceeded)
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InProgress => "InProgress",
            Self::PartiallySucceeded => "PartiallySucceeded",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Stopped => "Stopped",
        };
        f.write_str(s)
    }
}

/// Snapshot of one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCandidate {
    /// Build number, e.g. `Product.Main_20240101.1`
    pub number: String,
    /// Build definition the build belongs to
    pub definition: String,
    /// Local wall-clock finish time
    pub finish_time: NaiveDateTime,
    pub status: BuildStatus,
    /// Source revision the build was made from, e.g. `C12345`
    #[serde(default)]
    pub source_version: String,
}

impl BuildCandidate {
    /// Artifact directory of this build under `layout`.
    pub fn artifact_dir(&self, layout: &ArtifactLayout) -> PathBuf {
        layout.artifact_dir(&self.number)
    }
}

/// Where build outputs live: `<drop_root>/<build>/<platform>/<configuration>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    pub drop_root: PathBuf,
    pub platform: String,
    pub configuration: String,
}

impl ArtifactLayout {
    pub fn new(
        drop_root: impl Into<PathBuf>,
        platform: impl Into<String>,
        configuration: impl Into<String>,
    ) -> Self {
        Self {
            drop_root: drop_root.into(),
            platform: platform.into(),
            configuration: configuration.into(),
        }
    }

    pub fn artifact_dir(&self, build_number: &str) -> PathBuf {
        self.drop_root
            .join(build_number)
            .join(&self.platform)
            .join(&self.configuration)
    }

    pub fn drop_root(&self) -> &Path {
        &self.drop_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(BuildStatus::Succeeded, true)]
    #[case(BuildStatus::PartiallySucceeded, true)]
    #[case(BuildStatus::Failed, false)]
    #[case(BuildStatus::Stopped, false)]
    #[case(BuildStatus::InProgress, false)]
    fn test_is_successful(#[case] status: BuildStatus, #[case] expected: bool) {
        assert_eq!(status.is_successful(), expected);
    }

    #[test]
    fn test_artifact_dir() {
        let layout = ArtifactLayout::new("/drops", "x64", "Release");
        assert_eq!(
            layout.artifact_dir("Main_20240101.1"),
            PathBuf::from("/drops/Main_20240101.1/x64/Release")
        );
    }

    #[test]
    fn test_status_serde_names() {
        let json = serde_json::to_string(&BuildStatus::PartiallySucceeded).unwrap();
        assert_eq!(json, "\"PartiallySucceeded\"");
    }
}
