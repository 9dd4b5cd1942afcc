//! Eviction handle for queued requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle to a queued request.
///
/// Clones share eviction state: once the queue evicts the request, every
/// clone observes it and the owner must discard the response.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    id: u64,
    name: Arc<str>,
    key: Arc<str>,
    evicted: Arc<AtomicBool>,
}

impl RequestHandle {
    pub(crate) fn new(id: u64, name: &str, key: &str) -> Self {
        Self {
            id,
            name: Arc::from(name),
            key: Arc::from(key),
            evicted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Resource name the request is attributed to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Request key within the resource name.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn evict(&self) {
        self.evicted.store(true, Ordering::SeqCst);
    }

    /// Check if the queue evicted this request.
    pub fn is_evicted(&self) -> bool {
        self.evicted.load(Ordering::SeqCst)
    }

    /// Return an error if evicted, for early exits in multi-step requests.
    pub fn check(&self) -> Result<(), EvictedError> {
        if self.is_evicted() {
            Err(EvictedError)
        } else {
            Ok(())
        }
    }
}

/// Error returned when a request was evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictedError;

impl std::fmt::Display for EvictedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Request was evicted")
    }
}

impl std::error::Error for EvictedError {}

impl From<EvictedError> for crate::error::CatalogError {
    fn from(err: EvictedError) -> Self {
        crate::error::CatalogError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_handle_not_evicted() {
        let handle = RequestHandle::new(1, "foo", "get");
        assert!(!handle.is_evicted());
        assert!(handle.check().is_ok());
        assert_eq!(handle.name(), "foo");
        assert_eq!(handle.key(), "get");
    }

    #[test]
    fn test_clone_shares_eviction() {
        let handle = RequestHandle::new(1, "foo", "get");
        let clone = handle.clone();
        handle.evict();
        assert!(clone.is_evicted());
        assert_eq!(clone.check(), Err(EvictedError));
    }

    #[test]
    fn test_evicted_error_display() {
        assert_eq!(EvictedError.to_string(), "Request was evicted");
    }
}
