//! In-flight request tracking keyed by resource name.

use super::handle::RequestHandle;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// A request registered with the queue.
#[derive(Debug, Clone)]
pub struct QueuedRequest {
    pub name: String,
    pub handle: RequestHandle,
}

/// Tracks outstanding requests so renames and deletes can discard results
/// that belong to a resource's previous identity.
///
/// At most one request per `(name, key)` is current; enqueueing a duplicate
/// supersedes the older one.
#[derive(Debug, Default)]
pub struct RequestQueue {
    entries: Mutex<HashMap<String, Vec<QueuedRequest>>>,
    next_id: AtomicU64,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<QueuedRequest>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a request for `name` and return its handle.
    pub fn enqueue(&self, name: &str, key: &str) -> RequestHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = RequestHandle::new(id, name, key);

        let mut entries = self.lock();
        let queued = entries.entry(name.to_string()).or_default();
        queued.retain(|existing| {
            if existing.handle.key() == key {
                debug!("Superseding queued request {} for {}", existing.handle.id(), name);
                existing.handle.evict();
                false
            } else {
                true
            }
        });
        queued.push(QueuedRequest {
            name: name.to_string(),
            handle: handle.clone(),
        });
        handle
    }

    /// Drop a finished request if it is still tracked.
    pub fn complete(&self, handle: &RequestHandle) {
        let mut entries = self.lock();
        if let Some(queued) = entries.get_mut(handle.name()) {
            queued.retain(|entry| entry.handle.id() != handle.id());
            if queued.is_empty() {
                entries.remove(handle.name());
            }
        }
    }

    /// Evict every request attributed to `name`. Returns how many were evicted.
    pub fn remove_by_name(&self, name: &str) -> usize {
        let removed = self.lock().remove(name).unwrap_or_default();
        for entry in &removed {
            entry.handle.evict();
        }
        if !removed.is_empty() {
            debug!("Evicted {} queued request(s) for {}", removed.len(), name);
        }
        removed.len()
    }

    /// Run `request` under a queue entry.
    ///
    /// Returns `None` when the entry was evicted before the request finished;
    /// the result is dropped.
    pub async fn run<F, T>(&self, name: &str, key: &str, request: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let handle = self.enqueue(name, key);
        let guard = CompletionGuard {
            queue: self,
            handle: &handle,
        };
        let output = request.await;
        drop(guard);

        if handle.is_evicted() {
            debug!("Discarding result of evicted request for {}", name);
            None
        } else {
            Some(output)
        }
    }

    /// Outstanding requests for `name`.
    pub fn pending(&self, name: &str) -> usize {
        self.lock().get(name).map_or(0, Vec::len)
    }

    pub fn len(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Removes the entry when the request future finishes or is dropped.
struct CompletionGuard<'a> {
    queue: &'a RequestQueue,
    handle: &'a RequestHandle,
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.queue.complete(self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    #[test]
    fn test_enqueue_and_complete() {
        let queue = RequestQueue::new();
        let handle = queue.enqueue("foo", "get");
        assert_eq!(queue.pending("foo"), 1);

        queue.complete(&handle);
        assert_eq!(queue.pending("foo"), 0);
        assert!(queue.is_empty());
        assert!(!handle.is_evicted());
    }

    #[test]
    fn test_duplicate_key_supersedes() {
        let queue = RequestQueue::new();
        let first = queue.enqueue("foo", "get");
        let second = queue.enqueue("foo", "get");
        let other = queue.enqueue("foo", "totals");

        assert!(first.is_evicted());
        assert!(!second.is_evicted());
        assert!(!other.is_evicted());
        assert_eq!(queue.pending("foo"), 2);
    }

    #[test]
    fn test_remove_by_name_evicts_all_entries() {
        let queue = RequestQueue::new();
        let a = queue.enqueue("foo", "get");
        let b = queue.enqueue("foo", "totals");
        let c = queue.enqueue("bar", "get");

        assert_eq!(queue.remove_by_name("foo"), 2);
        assert!(a.is_evicted());
        assert!(b.is_evicted());
        assert!(!c.is_evicted());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.remove_by_name("missing"), 0);
    }

    #[tokio::test]
    async fn test_run_returns_output() {
        let queue = RequestQueue::new();
        let out = queue.run("foo", "get", async { 42 }).await;
        assert_eq!(out, Some(42));
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_run_discards_result_after_eviction() {
        let queue = Arc::new(RequestQueue::new());
        let (tx, rx) = oneshot::channel::<u32>();

        let runner = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.run("foo", "get", async { rx.await.unwrap() }).await })
        };

        while queue.pending("foo") == 0 {
            tokio::task::yield_now().await;
        }
        queue.remove_by_name("foo");
        tx.send(7).unwrap();

        assert_eq!(runner.await.unwrap(), None);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_run_releases_entry() {
        let queue = RequestQueue::new();
        let pending = queue.run("foo", "get", std::future::pending::<()>());
        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(10), pending).await;
        assert!(timed_out.is_err());
        assert!(queue.is_empty());
    }
}
