//! Locating the changeset that carries a given piece of content

use crate::{HistoryQuery, Result, RevisionToken, ServerPath, VersionControl};

/// Walks an item's history looking for content containing a signature.
pub struct HistorySearcher<'a> {
    vcs: &'a dyn VersionControl,
}

impl<'a> HistorySearcher<'a> {
    pub fn new(vcs: &'a dyn VersionControl) -> Self {
        Self { vcs }
    }

    /// Find the first revision in `query` whose content of `path` contains
    /// `signature`.
    ///
    /// Entries are examined in the order the history query returns them
    /// (newest first) and the search stops at the first match, so later
    /// entries are never downloaded. This is first-match, not earliest
    /// introduction: if the signature survives several revisions, the newest
    /// of them within the window is returned.
    ///
    /// Returns `Ok(None)` when no examined revision matches.
    pub fn find_changeset_introducing(
        &self,
        path: &ServerPath,
        signature: &str,
        query: &HistoryQuery,
    ) -> Result<Option<RevisionToken>> {
        if signature.is_empty() {
            return Ok(None);
        }

        let history = self.vcs.query_history(path, query)?;
        tracing::debug!(
            path = %path,
            candidates = history.len(),
            "Searching history for content signature"
        );

        for entry in history.into_iter().take(query.max_results) {
            let content = self.vcs.item_content(path, &entry.token)?;
            if String::from_utf8_lossy(&content).contains(signature) {
                tracing::debug!(path = %path, revision = %entry.token, "Signature found");
                return Ok(Some(entry.token));
            }
        }

        Ok(None)
    }
}
