//! File writes that never leave partial content behind, plus small
//! read and append helpers

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// Replace `path` with `content` so readers see either the old or the new
/// file, never a partial one. Missing parent directories are created.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;

    let staged = staging_path(path);
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&staged)
        .map_err(|e| Error::io(&staged, e))?;

    if let Err(e) = write_locked(&mut file, path, &staged, content) {
        let _ = fs::remove_file(&staged);
        return Err(e);
    }
    drop(file);

    fs::rename(&staged, path).map_err(|e| Error::io(path, e))
}

/// Hidden sibling of `path`, unique per process, on the same filesystem.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

fn write_locked(file: &mut File, target: &Path, staged: &Path, content: &[u8]) -> Result<()> {
    let locked = || Error::Locked {
        path: target.to_path_buf(),
    };

    file.lock_exclusive().map_err(|_| locked())?;
    file.write_all(content).map_err(|e| Error::io(staged, e))?;
    file.sync_all().map_err(|e| Error::io(staged, e))?;
    file.unlock().map_err(|_| locked())
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    Ok(())
}

/// Open `path` for appending, creating the file and its parent directory.
pub fn open_append(path: &Path) -> Result<fs::File> {
    ensure_parent_dir(path)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io(path, e))
}
