//! Git repository fixtures.
//!
//! The fixtures shell out to the `git` CLI so the resulting history looks
//! like one produced by a developer.

use std::fs;
use std::path::Path;
use std::process::Command;

fn run(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .unwrap_or_else(|e| panic!("failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "`git {args:?}` failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Commit everything staged, with a timestamp one minute after the
/// previous commit so time-sorted walks are deterministic.
fn commit_staged(path: &Path, message: &str) {
    let count: i64 = run(path, &["rev-list", "--count", "--all"])
        .parse()
        .unwrap_or(0);
    let date = format!("{} +0000", 1_704_067_200 + count * 60);

    let output = Command::new("git")
        .args(["commit", "-m", message])
        .env("GIT_AUTHOR_DATE", &date)
        .env("GIT_COMMITTER_DATE", &date)
        .current_dir(path)
        .output()
        .unwrap_or_else(|e| panic!("failed to run git commit: {e}"));
    if !output.status.success() {
        panic!(
            "git commit failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Initialises a git repository with an identity and an initial commit.
///
/// The initial commit contains a single `README.md`.
///
/// # Panics
/// Panics if any git operation fails.
pub fn real_git_repo_with_commit(path: &Path) {
    run(path, &["init"]);
    run(path, &["config", "user.email", "test@test.com"]);
    run(path, &["config", "user.name", "Test User"]);
    run(path, &["config", "commit.gpgsign", "false"]);

    fs::write(path.join("README.md"), "# Depot")
        .unwrap_or_else(|e| panic!("failed to write README.md: {e}"));

    run(path, &["add", "."]);
    commit_staged(path, "Initial commit");
}

/// Writes `content` to `relative` inside the repository and commits it.
///
/// Returns the full id of the new commit.
///
/// # Panics
/// Panics if the file cannot be written or a git operation fails.
pub fn commit_file(repo: &Path, relative: &str, content: &str, message: &str) -> String {
    let target = repo.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("failed to create {}: {e}", parent.display()));
    }
    fs::write(&target, content)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", target.display()));

    run(repo, &["add", relative]);
    commit_staged(repo, message);
    run(repo, &["rev-parse", "HEAD"])
}

/// Removes `relative` from the repository and commits the removal.
///
/// Returns the full id of the new commit.
///
/// # Panics
/// Panics if a git operation fails.
pub fn remove_file(repo: &Path, relative: &str, message: &str) -> String {
    run(repo, &["rm", "-q", relative]);
    commit_staged(repo, message);
    run(repo, &["rev-parse", "HEAD"])
}
