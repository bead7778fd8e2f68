use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;
use switch_mirror::{
    CopyProgress, CopyProgressMonitor, MirrorHandle, MirrorLauncher, MirrorOutcome, MonitorTiming,
    ProgressSink, Result,
};
use switch_test_utils::mirror::{CopyingLauncher, SteppingLauncher};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingSink {
    reports: Vec<u8>,
    finished: bool,
}

impl ProgressSink for RecordingSink {
    fn report(&mut self, progress: &CopyProgress) {
        self.reports.push(progress.percent());
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

fn populate(dir: &Path, count: usize) {
    fs::create_dir_all(dir.join("sub")).unwrap();
    for i in 0..count {
        let name = if i % 2 == 0 {
            format!("file{i:03}.dll")
        } else {
            format!("sub/file{i:03}.pdb")
        };
        fs::write(dir.join(name), "x").unwrap();
    }
}

fn fast_timing() -> MonitorTiming {
    MonitorTiming {
        poll_interval: Duration::from_millis(5),
        window: Duration::from_millis(1),
        max_wait: None,
    }
}

#[test]
fn test_fresh_destination_is_monitored() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("drop");
    let destination = temp.path().join("ws/bin");
    populate(&source, 100);

    let launcher = CopyingLauncher;
    let monitor = CopyProgressMonitor::new(&launcher).with_timing(fast_timing());
    let mut sink = RecordingSink::default();
    let report = monitor
        .mirror_directory(&source, &destination, &mut sink)
        .unwrap();

    assert!(report.estimated);
    assert_eq!(report.samples, vec![CopyProgress::new(100, 100)]);
    assert_eq!(report.last_percent(), Some(100));
    // Reached 100% in the first window: no re-arm.
    assert_eq!(report.windows, 1);
    assert_eq!(sink.reports, vec![0, 100]);
    assert!(sink.finished);
    assert!(report.outcome.success);
}

#[test]
fn test_existing_destination_skips_monitoring() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("drop");
    let destination = temp.path().join("ws/bin");
    populate(&source, 10);
    fs::create_dir_all(&destination).unwrap();
    fs::write(destination.join("stale.dll"), "old").unwrap();

    let launcher = CopyingLauncher;
    let monitor = CopyProgressMonitor::new(&launcher).with_timing(fast_timing());
    let mut sink = RecordingSink::default();
    let report = monitor
        .mirror_directory(&source, &destination, &mut sink)
        .unwrap();

    assert!(!report.estimated);
    assert!(report.samples.is_empty());
    assert_eq!(report.windows, 0);
    assert!(sink.reports.is_empty());
    assert!(sink.finished);
}

#[test]
fn test_empty_destination_dir_counts_as_fresh() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("drop");
    let destination = temp.path().join("ws/bin");
    populate(&source, 4);
    fs::create_dir_all(destination.join("empty/sub")).unwrap();

    let launcher = CopyingLauncher;
    let report = CopyProgressMonitor::new(&launcher)
        .with_timing(fast_timing())
        .mirror_directory(&source, &destination, &mut ())
        .unwrap();

    assert!(report.estimated);
}

#[test]
fn test_progress_is_non_decreasing_and_rearms_windows() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("drop");
    let destination = temp.path().join("ws/bin");
    populate(&source, 10);

    let launcher = SteppingLauncher;
    let monitor = CopyProgressMonitor::new(&launcher).with_timing(fast_timing());
    let report = monitor
        .mirror_directory(&source, &destination, &mut ())
        .unwrap();

    let percents: Vec<u8> = report.samples.iter().map(CopyProgress::percent).collect();
    assert_eq!(percents.len(), 10);
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(percents.last(), Some(&100));
    // Each window holds at most two samples at this pacing.
    assert!(report.windows > 1, "windows: {}", report.windows);
    // The denominator is fixed for the whole session.
    assert!(report.samples.iter().all(|s| s.total == 10));
}

#[test]
fn test_empty_source_is_complete_immediately() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("drop");
    let destination = temp.path().join("ws/bin");
    fs::create_dir_all(&source).unwrap();

    let launcher = SteppingLauncher;
    let report = CopyProgressMonitor::new(&launcher)
        .with_timing(fast_timing())
        .mirror_directory(&source, &destination, &mut ())
        .unwrap();

    assert_eq!(report.samples, vec![CopyProgress::new(0, 0)]);
    assert_eq!(report.windows, 1);
}

/// Launches nothing; polling always fails but waiting succeeds.
struct UnpollableLauncher {
    waited: Arc<AtomicBool>,
}

struct UnpollableHandle {
    waited: Arc<AtomicBool>,
}

impl MirrorLauncher for UnpollableLauncher {
    fn launch(&self, _source: &Path, _destination: &Path) -> Result<Box<dyn MirrorHandle>> {
        Ok(Box::new(UnpollableHandle {
            waited: Arc::clone(&self.waited),
        }))
    }
}

impl MirrorHandle for UnpollableHandle {
    fn has_exited(&mut self) -> Result<bool> {
        Err(io::Error::other("process table unavailable").into())
    }

    fn wait(self: Box<Self>) -> Result<MirrorOutcome> {
        self.waited.store(true, Ordering::SeqCst);
        Ok(MirrorOutcome::succeeded(""))
    }
}

#[test]
fn test_poll_failure_still_waits_for_mirror() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("drop");
    populate(&source, 4);

    let launcher = UnpollableLauncher {
        waited: Arc::new(AtomicBool::new(false)),
    };
    let mut sink = RecordingSink::default();
    let report = CopyProgressMonitor::new(&launcher)
        .with_timing(fast_timing())
        .mirror_directory(&source, &temp.path().join("ws/bin"), &mut sink)
        .unwrap();

    assert!(launcher.waited.load(Ordering::SeqCst));
    assert!(report.outcome.success);
    assert!(report.estimated);
    assert!(report.samples.is_empty());
    assert_eq!(report.windows, 1);
    assert_eq!(sink.reports, vec![0]);
    assert!(sink.finished);
}
