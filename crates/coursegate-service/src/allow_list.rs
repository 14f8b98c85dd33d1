//! Identifiers permitted to log in.
//!
//! ## Summary
//! The list lives in a newline-delimited text file and is held in memory as a
//! set. A reload builds the new set off to the side and swaps it in under a
//! short write lock, so concurrent readers see either the old or the new set.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

#[derive(Debug)]
pub struct AllowList {
    path: PathBuf,
    ids: RwLock<Arc<HashSet<String>>>,
}

impl AllowList {
    /// ## Summary
    /// Creates an allow-list backed by `path` and performs the initial load.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let list = Self {
            path: path.into(),
            ids: RwLock::new(Arc::new(HashSet::new())),
        };
        list.reload().await;
        list
    }

    /// ## Summary
    /// Re-reads the backing file and replaces the in-memory set.
    ///
    /// A missing or unreadable file leaves the list empty; the failure is only
    /// logged. Returns the number of identifiers now loaded.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn reload(&self) -> usize {
        let ids = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => parse_identifiers(&text),
            Err(e) => {
                tracing::warn!(error = %e, "Allow-list file unreadable, clearing allow-list");
                HashSet::new()
            }
        };

        let count = ids.len();
        *self.ids.write() = Arc::new(ids);

        tracing::info!(count, "Allow-list loaded");
        count
    }

    #[must_use]
    pub fn is_allowed(&self, id: &str) -> bool {
        self.ids.read().contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.read().is_empty()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current set, unaffected by later reloads.
    #[must_use]
    pub fn snapshot(&self) -> Arc<HashSet<String>> {
        Arc::clone(&self.ids.read())
    }
}

/// ## Summary
/// Parses allow-list file contents: the first whitespace-delimited token of
/// every non-blank line is an identifier.
#[must_use]
pub fn parse_identifiers(text: &str) -> HashSet<String> {
    text.lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_owned)
        .collect()
}
