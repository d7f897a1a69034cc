// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Causal-consistency bookmark management
//!
//! The client holds one process-wide bookmark set per instance. Anyone
//! opening a new session takes a snapshot under the read lock; whenever a
//! client-owned session closes, the bookmarks that seeded it are replaced by
//! the bookmark it produced under the write lock. The lock is never held
//! across an await.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// An opaque causal-consistency token returned by the database after a
/// completed transaction. A session seeded with a bookmark observes at least
/// the effects of the transaction that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bookmark(String);

impl Bookmark {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The per-client bookmark set.
#[derive(Default)]
pub struct BookmarkManager {
    bookmarks: RwLock<HashSet<Bookmark>>,
}

impl BookmarkManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current bookmark set, taken under the read lock.
    pub fn snapshot(&self) -> HashSet<Bookmark> {
        self.bookmarks.read().clone()
    }

    /// Replace the bookmarks a session consumed with the bookmark it
    /// produced, atomically under the write lock.
    ///
    /// A session that produced no bookmark still retires the tokens it
    /// consumed: they are superseded by whatever the server now knows.
    pub fn update(&self, used: &HashSet<Bookmark>, produced: Option<Bookmark>) {
        let mut bookmarks = self.bookmarks.write();
        for bookmark in used {
            bookmarks.remove(bookmark);
        }
        if let Some(bookmark) = produced {
            log::trace!("bookmark set advanced to {}", bookmark);
            bookmarks.insert(bookmark);
        }
    }

    pub fn len(&self) -> usize {
        self.bookmarks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bm(value: &str) -> Bookmark {
        Bookmark::new(value)
    }

    #[test]
    fn test_update_swaps_consumed_for_produced() {
        let manager = BookmarkManager::new();
        manager.update(&HashSet::new(), Some(bm("a")));
        manager.update(&HashSet::new(), Some(bm("b")));
        assert_eq!(manager.len(), 2);

        let used: HashSet<Bookmark> = [bm("a"), bm("b")].into_iter().collect();
        manager.update(&used, Some(bm("c")));

        assert_eq!(manager.snapshot(), [bm("c")].into_iter().collect());
    }

    #[test]
    fn test_update_without_produced_bookmark_retires_consumed() {
        let manager = BookmarkManager::new();
        manager.update(&HashSet::new(), Some(bm("a")));

        let used: HashSet<Bookmark> = [bm("a")].into_iter().collect();
        manager.update(&used, None);

        assert!(manager.is_empty());
    }

    #[test]
    fn test_unconsumed_bookmarks_survive() {
        let manager = BookmarkManager::new();
        manager.update(&HashSet::new(), Some(bm("a")));

        // A session seeded before "a" existed closes with "b".
        manager.update(&HashSet::new(), Some(bm("b")));

        let snapshot = manager.snapshot();
        assert!(snapshot.contains(&bm("a")));
        assert!(snapshot.contains(&bm("b")));
    }
}
