//! Fetch options and per-fetch outcome tallies

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a fetch treats the items it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Descend into sub-folders of the requested paths
    pub recursive: bool,
    /// Replace local files that differ from the requested revision
    pub overwrite: bool,
    /// Rewrite files even when they already match
    pub force: bool,
}

impl FetchOptions {
    /// Full recursive fetch that overwrites local differences.
    pub fn overwrite() -> Self {
        Self {
            recursive: true,
            overwrite: true,
            force: false,
        }
    }

    /// Full recursive fetch that rewrites every item.
    pub fn get_all() -> Self {
        Self {
            recursive: true,
            overwrite: true,
            force: true,
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::overwrite()
    }
}

/// Counts of what a fetch did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub operations: u32,
    pub updated: u32,
    pub no_action_needed: u32,
    pub conflicts: u32,
    pub failures: u32,
    pub warnings: u32,
    pub have_resolvable_warnings: bool,
}

impl SyncResult {
    pub fn is_clean(&self) -> bool {
        self.conflicts == 0 && self.failures == 0
    }

    /// Add another result's counts into this one.
    pub fn absorb(&mut self, other: &SyncResult) {
        self.operations += other.operations;
        self.updated += other.updated;
        self.no_action_needed += other.no_action_needed;
        self.conflicts += other.conflicts;
        self.failures += other.failures;
        self.warnings += other.warnings;
        self.have_resolvable_warnings |= other.have_resolvable_warnings;
    }
}

impl fmt::Display for SyncResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} operations, {} updated, {} unchanged, {} conflicts, {} failures, {} warnings",
            self.operations,
            self.updated,
            self.no_action_needed,
            self.conflicts,
            self.failures,
            self.warnings
        )
    }
}
