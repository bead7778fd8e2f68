//! Writing tree contents into mapped local folders

use std::fs;
use std::path::{Path, PathBuf};

use git2::{ObjectType, Oid, Repository, Tree, TreeWalkMode, TreeWalkResult};

use crate::{FetchOptions, Result, ServerPath, SyncResult};

/// Materialize `path` from `tree` at `local`, tallying into `result`.
///
/// Items missing at the revision count as failures; individual write
/// failures are tallied rather than aborting the fetch.
pub(super) fn materialize(
    repo: &Repository,
    tree: &Tree<'_>,
    path: &ServerPath,
    local: &Path,
    options: FetchOptions,
    result: &mut SyncResult,
) -> Result<()> {
    let blobs = if path.is_root() {
        collect_blobs(tree, local, options.recursive)?
    } else {
        let Ok(entry) = tree.get_path(Path::new(path.relative())) else {
            tracing::warn!(path = %path, "Item does not exist at the requested revision");
            result.failures += 1;
            return Ok(());
        };
        match entry.kind() {
            Some(ObjectType::Blob) => vec![(local.to_path_buf(), entry.id())],
            Some(ObjectType::Tree) => {
                let subtree = repo.find_tree(entry.id())?;
                collect_blobs(&subtree, local, options.recursive)?
            }
            _ => {
                result.warnings += 1;
                return Ok(());
            }
        }
    };

    for (target, oid) in blobs {
        result.operations += 1;
        let blob = repo.find_blob(oid)?;
        write_item(&target, blob.content(), options, result);
    }
    Ok(())
}

fn collect_blobs(tree: &Tree<'_>, local: &Path, recursive: bool) -> Result<Vec<(PathBuf, Oid)>> {
    let mut blobs = Vec::new();
    tree.walk(TreeWalkMode::PreOrder, |dir, entry| match entry.kind() {
        Some(ObjectType::Blob) => {
            let name = entry.name().unwrap_or_default();
            let target = dir
                .split('/')
                .filter(|s| !s.is_empty())
                .fold(local.to_path_buf(), |acc, seg| acc.join(seg))
                .join(name);
            blobs.push((target, entry.id()));
            TreeWalkResult::Ok
        }
        Some(ObjectType::Tree) if !recursive => TreeWalkResult::Skip,
        _ => TreeWalkResult::Ok,
    })?;
    Ok(blobs)
}

fn write_item(target: &Path, content: &[u8], options: FetchOptions, result: &mut SyncResult) {
    if let Ok(existing) = fs::read(target) {
        if existing == content && !options.force {
            result.no_action_needed += 1;
            return;
        }
        if existing != content && !options.overwrite {
            tracing::warn!(path = %target.display(), "Local file differs, not overwriting");
            result.conflicts += 1;
            return;
        }
    }

    let written = target
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| fs::write(target, content));

    match written {
        Ok(()) => result.updated += 1,
        Err(e) => {
            tracing::warn!(path = %target.display(), error = %e, "Failed to write item");
            result.failures += 1;
        }
    }
}
