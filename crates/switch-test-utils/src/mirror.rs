//! Mirror launchers that copy in-process instead of running a tool.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use switch_mirror::{MirrorHandle, MirrorLauncher, MirrorOutcome, Result};
use walkdir::WalkDir;

fn planned_copies(source: &Path, destination: &Path) -> VecDeque<(PathBuf, PathBuf)> {
    WalkDir::new(source)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(source).unwrap().to_path_buf();
            (e.path().to_path_buf(), destination.join(relative))
        })
        .collect()
}

fn copy_one(from: &Path, to: &Path) {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::copy(from, to).unwrap();
}

/// Copies everything synchronously during `launch`.
#[derive(Debug, Default)]
pub struct CopyingLauncher;

impl MirrorLauncher for CopyingLauncher {
    fn launch(&self, source: &Path, destination: &Path) -> Result<Box<dyn MirrorHandle>> {
        fs::create_dir_all(destination).unwrap();
        for (from, to) in planned_copies(source, destination) {
            copy_one(&from, &to);
        }
        Ok(Box::new(SteppingHandle {
            pending: VecDeque::new(),
        }))
    }
}

/// Copies one file each time the monitor polls for exit.
///
/// Progress therefore advances exactly one file per sample.
#[derive(Debug, Default)]
pub struct SteppingLauncher;

impl MirrorLauncher for SteppingLauncher {
    fn launch(&self, source: &Path, destination: &Path) -> Result<Box<dyn MirrorHandle>> {
        fs::create_dir_all(destination).unwrap();
        Ok(Box::new(SteppingHandle {
            pending: planned_copies(source, destination),
        }))
    }
}

struct SteppingHandle {
    pending: VecDeque<(PathBuf, PathBuf)>,
}

impl MirrorHandle for SteppingHandle {
    fn has_exited(&mut self) -> Result<bool> {
        if let Some((from, to)) = self.pending.pop_front() {
            copy_one(&from, &to);
        }
        Ok(self.pending.is_empty())
    }

    fn wait(mut self: Box<Self>) -> Result<MirrorOutcome> {
        while let Some((from, to)) = self.pending.pop_front() {
            copy_one(&from, &to);
        }
        Ok(MirrorOutcome::succeeded("mirrored"))
    }
}
