//! The build-system seam

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::{BuildCandidate, Result};

/// Inclusive finish-time window of a build query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl FinishWindow {
    /// The full calendar day `day`, 00:00:00 through 23:59:59.
    pub fn for_day(day: NaiveDate) -> Self {
        let start = day.and_time(NaiveTime::MIN);
        let end = start + Duration::days(1) - Duration::seconds(1);
        Self { start, end }
    }

    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Queries against a build system.
pub trait BuildServer {
    /// Builds of `definition` that finished within `window`, in chronological
    /// order.
    fn query_builds(&self, definition: &str, window: &FinishWindow) -> Result<Vec<BuildCandidate>>;

    /// The build of `definition` numbered `number`, if any.
    fn get_build(&self, definition: &str, number: &str) -> Result<Option<BuildCandidate>>;
}
