//! File counting for progress estimation
//!
//! Counting never fails: unreadable entries are skipped and a missing
//! directory counts as empty.

use std::path::Path;

use walkdir::WalkDir;

/// Count regular files below `dir`, recursively.
pub fn count_files(dir: &Path) -> u64 {
    if !dir.is_dir() {
        return 0;
    }

    let mut count = 0;
    for entry in WalkDir::new(dir).min_depth(1) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => count += 1,
            Ok(_) => {}
            Err(e) => tracing::trace!(error = %e, "Skipping unreadable entry while counting"),
        }
    }
    count
}

/// Whether `dir` contains at least one regular file.
pub fn dir_has_files(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }

    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|e| e.file_type().is_file())
}
