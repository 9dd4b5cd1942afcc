//! Per-path mutual exclusion for file operations.

use crate::paths::normalize_path;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// Serializes renames and deletes that touch the same path.
///
/// Multi-path acquisitions lock in lexical order so two renames in opposite
/// directions cannot deadlock.
#[derive(Debug, Default, Clone)]
pub struct PathLocks {
    locks: Arc<Mutex<LockMap>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, LockMap> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock every path in `paths` (duplicates and aliases collapse).
    ///
    /// The guard exists before the first wait, so a cancelled acquisition
    /// still releases and prunes whatever it already touched.
    pub async fn acquire(&self, paths: &[&str]) -> PathGuard {
        let keys: BTreeSet<String> = paths.iter().map(|p| normalize_path(p)).collect();
        let mut guard = PathGuard {
            locks: self.clone(),
            guards: Vec::with_capacity(keys.len()),
            keys: keys.into_iter().collect(),
        };

        for key in &guard.keys {
            let lock = self.map().entry(key.clone()).or_default().clone();
            guard.guards.push(lock.lock_owned().await);
        }
        guard
    }

    /// Number of paths with a live lock entry.
    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    /// Drop entries nobody holds or waits on.
    fn prune(&self, keys: &[String]) {
        let mut map = self.map();
        for key in keys {
            if map.get(key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
                map.remove(key);
            }
        }
    }
}

/// Held locks; released on drop.
pub struct PathGuard {
    locks: PathLocks,
    keys: Vec<String>,
    guards: Vec<OwnedMutexGuard<()>>,
}

impl PathGuard {
    pub fn paths(&self) -> &[String] {
        &self.keys
    }
}

impl Drop for PathGuard {
    fn drop(&mut self) {
        self.guards.clear();
        self.locks.prune(&self.keys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_guard_normalizes_and_dedupes() {
        let locks = PathLocks::new();
        let guard = locks
            .acquire(&["/models/b.sql", "models/a.sql", "/models//b.sql"])
            .await;
        assert_eq!(guard.paths(), ["/models/a.sql", "/models/b.sql"]);
        assert_eq!(locks.len(), 2);
        drop(guard);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_same_path_is_exclusive() {
        let locks = PathLocks::new();
        let held = locks.acquire(&["/models/a.sql"]).await;

        let blocked = tokio::time::timeout(
            Duration::from_millis(20),
            locks.acquire(&["models/a.sql"]),
        )
        .await;
        assert!(blocked.is_err());

        drop(held);
        let reacquired =
            tokio::time::timeout(Duration::from_millis(200), locks.acquire(&["/models/a.sql"]))
                .await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_acquire_prunes_partial_entries() {
        let locks = PathLocks::new();
        let held = locks.acquire(&["/models/b.sql"]).await;

        // Takes a.sql, then waits on b.sql until the timeout drops it.
        let cancelled = tokio::time::timeout(
            Duration::from_millis(20),
            locks.acquire(&["/models/a.sql", "/models/b.sql"]),
        )
        .await;
        assert!(cancelled.is_err());
        assert_eq!(locks.len(), 1);

        drop(held);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_disjoint_paths_do_not_block() {
        let locks = PathLocks::new();
        let _a = locks.acquire(&["/models/a.sql"]).await;
        let b = tokio::time::timeout(Duration::from_millis(200), locks.acquire(&["/models/b.sql"]))
            .await;
        assert!(b.is_ok());
    }
}
