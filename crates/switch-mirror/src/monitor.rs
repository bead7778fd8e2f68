//! Progress estimation for mirror operations
//!
//! The mirror tool reports nothing useful while it runs, so progress is
//! estimated from the outside: the source file count is taken once, then
//! the destination is recounted at a fixed pace. This is a heuristic. Equal
//! file counts do not prove the bytes are all there.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use switch_fs::{count_files, dir_has_files};

use crate::{MirrorHandle, MirrorLauncher, MirrorOutcome, Result};

/// Pacing of progress observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorTiming {
    /// Pause between two samples
    pub poll_interval: Duration,
    /// Length of one observation window; an expired window is re-armed
    pub window: Duration,
    /// Stop observing after this long; `None` observes until completion
    pub max_wait: Option<Duration>,
}

impl Default for MonitorTiming {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            window: Duration::from_secs(30),
            max_wait: None,
        }
    }
}

/// One progress sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyProgress {
    /// Files currently present at the destination
    pub present: u64,
    /// Files present at the source when observation started
    pub total: u64,
}

impl CopyProgress {
    pub fn new(present: u64, total: u64) -> Self {
        Self { present, total }
    }

    /// Floored completion percentage, clamped to 100.
    ///
    /// An empty source counts as complete.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = self.present.saturating_mul(100) / self.total;
        u8::try_from(pct.min(100)).unwrap_or(100)
    }

    pub fn is_complete(&self) -> bool {
        self.present >= self.total
    }
}

/// Receives progress while a mirror runs.
pub trait ProgressSink {
    fn report(&mut self, progress: &CopyProgress);

    /// Called once the mirror operation has finished.
    fn finish(&mut self) {}
}

/// Sink that discards progress.
impl ProgressSink for () {
    fn report(&mut self, _progress: &CopyProgress) {}
}

/// What happened during a monitored mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorReport {
    pub outcome: MirrorOutcome,
    /// Whether progress was estimated (fresh destination)
    pub estimated: bool,
    /// Samples taken, in order
    pub samples: Vec<CopyProgress>,
    /// Observation windows armed
    pub windows: u32,
}

impl MirrorReport {
    pub fn last_percent(&self) -> Option<u8> {
        self.samples.last().map(CopyProgress::percent)
    }
}

/// Runs a mirror operation and estimates its progress.
pub struct CopyProgressMonitor<'a> {
    launcher: &'a dyn MirrorLauncher,
    timing: MonitorTiming,
}

impl<'a> CopyProgressMonitor<'a> {
    pub fn new(launcher: &'a dyn MirrorLauncher) -> Self {
        Self {
            launcher,
            timing: MonitorTiming::default(),
        }
    }

    pub fn with_timing(mut self, timing: MonitorTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Mirror `source` into `destination`, blocking until the tool exits.
    ///
    /// Progress is only estimated when `destination` holds no files before
    /// the mirror starts; an incremental update of an existing destination
    /// just waits for completion.
    pub fn mirror_directory(
        &self,
        source: &Path,
        destination: &Path,
        sink: &mut dyn ProgressSink,
    ) -> Result<MirrorReport> {
        let fresh = !dir_has_files(destination);
        let mut handle = self.launcher.launch(source, destination)?;

        let mut samples = Vec::new();
        let mut windows = 0;
        if fresh {
            let total = count_files(source);
            sink.report(&CopyProgress::new(0, total));
            windows = self.observe(total, destination, handle.as_mut(), sink, &mut samples);
        } else {
            tracing::info!(
                "Cannot evaluate download progress because an existing workspace is being updated"
            );
            tracing::info!("Wait please...");
        }

        let outcome = handle.wait()?;
        sink.finish();

        if !outcome.output.trim().is_empty() {
            tracing::debug!(output = %outcome.output, "Mirror tool output");
        }
        if !outcome.success {
            tracing::warn!(exit_code = ?outcome.exit_code, "Mirror tool reported failure");
        }

        Ok(MirrorReport {
            outcome,
            estimated: fresh,
            samples,
            windows,
        })
    }

    /// Sample until complete, returning the number of windows armed.
    ///
    /// Sampling also ends when the mirror process has exited (the count
    /// cannot grow any more), when it can no longer be polled, or when
    /// `max_wait` is exceeded.
    fn observe(
        &self,
        total: u64,
        destination: &Path,
        handle: &mut dyn MirrorHandle,
        sink: &mut dyn ProgressSink,
        samples: &mut Vec<CopyProgress>,
    ) -> u32 {
        let started = Instant::now();
        let mut windows = 0;

        loop {
            windows += 1;
            let deadline = Instant::now() + self.timing.window;

            loop {
                let exited = match handle.has_exited() {
                    Ok(exited) => exited,
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "Cannot poll the mirror process, waiting for it to finish"
                        );
                        return windows;
                    }
                };
                let progress = CopyProgress::new(count_files(destination), total);
                sink.report(&progress);
                samples.push(progress);

                if progress.is_complete() {
                    return windows;
                }
                if exited {
                    tracing::debug!(
                        percent = progress.percent(),
                        "Mirror exited before the destination reached the source count"
                    );
                    return windows;
                }
                if let Some(max_wait) = self.timing.max_wait
                    && started.elapsed() >= max_wait
                {
                    tracing::warn!(
                        percent = progress.percent(),
                        "Giving up on progress estimation, waiting for the mirror to finish"
                    );
                    return windows;
                }
                if Instant::now() >= deadline {
                    break;
                }
                thread::sleep(self.timing.poll_interval);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 100, 0)]
    #[case(1, 3, 33)]
    #[case(99, 100, 99)]
    #[case(100, 100, 100)]
    #[case(120, 100, 100)]
    #[case(0, 0, 100)]
    fn test_percent(#[case] present: u64, #[case] total: u64, #[case] expected: u8) {
        assert_eq!(CopyProgress::new(present, total).percent(), expected);
    }

    #[test]
    fn test_complete_when_counts_match() {
        assert!(CopyProgress::new(5, 5).is_complete());
        assert!(!CopyProgress::new(4, 5).is_complete());
        assert!(CopyProgress::new(0, 0).is_complete());
    }
}
