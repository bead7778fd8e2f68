//! Per-item history extraction

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use git2::{Commit, Oid, Repository, Sort};

use crate::{Result, RevisionEntry, RevisionToken, ServerPath};

/// Commits that changed `path`, newest first.
///
/// Walks from `tip` in time order and keeps commits where the object at
/// `path` differs from the first parent's. Commits that removed `path` are
/// left out since there is no content to read at them. The walk ends after `max_results`
/// entries or once the `floor` commit has been examined.
pub(super) fn item_history(
    repo: &Repository,
    tip: &Commit<'_>,
    path: &ServerPath,
    floor: Option<Oid>,
    max_results: usize,
) -> Result<Vec<RevisionEntry>> {
    let item = Path::new(path.relative());

    let mut revwalk = repo.revwalk()?;
    revwalk.push(tip.id())?;
    revwalk.set_sorting(Sort::TIME)?;

    let mut entries = Vec::with_capacity(max_results);
    for oid_result in revwalk {
        if entries.len() >= max_results {
            break;
        }

        let oid = oid_result?;
        let commit = repo.find_commit(oid)?;

        if touches(&commit, item)? {
            entries.push(entry_for(&commit));
        }

        if Some(oid) == floor {
            break;
        }
    }

    Ok(entries)
}

fn touches(commit: &Commit<'_>, item: &Path) -> Result<bool> {
    let Some(current) = object_at(commit, item)? else {
        return Ok(false);
    };
    let previous = match commit.parent(0) {
        Ok(parent) => object_at(&parent, item)?,
        Err(_) => None,
    };
    Ok(previous != Some(current))
}

fn object_at(commit: &Commit<'_>, item: &Path) -> Result<Option<Oid>> {
    let tree = commit.tree()?;
    if item.as_os_str().is_empty() {
        return Ok(Some(tree.id()));
    }
    Ok(tree.get_path(item).ok().map(|entry| entry.id()))
}

fn entry_for(commit: &Commit<'_>) -> RevisionEntry {
    let timestamp: DateTime<Utc> = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_default();

    let comment = commit
        .message()
        .unwrap_or("")
        .lines()
        .next()
        .unwrap_or("")
        .to_string();

    RevisionEntry {
        token: RevisionToken::new(commit.id().to_string()),
        author: commit.author().name().unwrap_or("Unknown").to_string(),
        comment,
        timestamp,
    }
}
