//! Finding the most recent usable build

use chrono::{Days, NaiveDate};

use crate::{ArtifactLayout, BuildCandidate, BuildServer, FinishWindow, Result};

/// Number of days scanned when no window is configured.
pub const DEFAULT_WINDOW_DAYS: u32 = 15;

/// Scans backwards through a bounded window of days for a usable build.
pub struct BuildSelector<'a> {
    server: &'a dyn BuildServer,
    layout: &'a ArtifactLayout,
    window_days: u32,
}

impl<'a> BuildSelector<'a> {
    pub fn new(server: &'a dyn BuildServer, layout: &'a ArtifactLayout) -> Self {
        Self {
            server,
            layout,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days;
        self
    }

    /// Whether `candidate` may be selected for `definition`.
    ///
    /// The artifact directory must exist, the status must be one of the
    /// successful ones and the build number must contain the definition name.
    pub fn is_usable(&self, candidate: &BuildCandidate, definition: &str) -> bool {
        candidate.status.is_successful()
            && candidate.number.contains(definition)
            && candidate.artifact_dir(self.layout).is_dir()
    }

    /// Most recent usable build of `definition`, scanning `today` and the
    /// preceding days of the window.
    ///
    /// Days are visited newest first; within a day the builds are visited in
    /// reverse of the server's chronological order. `Ok(None)` means nothing
    /// in the window qualified.
    pub fn select(&self, definition: &str, today: NaiveDate) -> Result<Option<BuildCandidate>> {
        for offset in 0..self.window_days {
            let Some(day) = today.checked_sub_days(Days::new(u64::from(offset))) else {
                break;
            };

            let builds = self
                .server
                .query_builds(definition, &FinishWindow::for_day(day))?;
            tracing::debug!(%day, count = builds.len(), "Examining builds");

            for candidate in builds.into_iter().rev() {
                if self.is_usable(&candidate, definition) {
                    tracing::info!(build = %candidate.number, "Found one: {}", candidate.number);
                    return Ok(Some(candidate));
                }
                tracing::debug!(
                    build = %candidate.number,
                    status = %candidate.status,
                    "Build not usable"
                );
            }
        }
        Ok(None)
    }
}
