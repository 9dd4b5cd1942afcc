//! Versioned cache cell for the latest resource listing.

use crate::client::{with_retry, CatalogClient, RetryPolicy};
use crate::error::Result;
use crate::models::{ResourceKind, ResourceRecord};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Immutable resource listing tagged with a version.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    /// Incremented on every replacement; 0 means nothing was fetched yet.
    pub version: u64,
    pub resources: Vec<ResourceRecord>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl CatalogSnapshot {
    fn empty() -> Self {
        Self {
            version: 0,
            resources: Vec::new(),
            fetched_at: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.fetched_at.is_some()
    }

    /// Resources of one kind.
    pub fn of_kind<'a>(&'a self, kind: &'a ResourceKind) -> impl Iterator<Item = &'a ResourceRecord> {
        self.resources.iter().filter(move |r| r.kind() == kind)
    }
}

/// Single-writer cell holding the latest [`CatalogSnapshot`].
///
/// Only the catalog refresh writes; readers take `Arc` snapshots or
/// subscribe to version bumps.
#[derive(Debug)]
pub struct CatalogCache {
    sender: watch::Sender<Arc<CatalogSnapshot>>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCache {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Arc::new(CatalogSnapshot::empty()));
        Self { sender }
    }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.sender.borrow().clone()
    }

    pub fn version(&self) -> u64 {
        self.sender.borrow().version
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<CatalogSnapshot>> {
        self.sender.subscribe()
    }

    /// Store a new listing and bump the version.
    pub fn replace(&self, resources: Vec<ResourceRecord>) -> Arc<CatalogSnapshot> {
        let mut stored = None;
        self.sender.send_modify(|current| {
            let next = Arc::new(CatalogSnapshot {
                version: current.version + 1,
                resources,
                fetched_at: Some(Utc::now()),
            });
            stored = Some(next.clone());
            *current = next;
        });
        let snapshot = stored.unwrap_or_else(|| self.snapshot());
        debug!(
            "Catalog snapshot v{} with {} resources",
            snapshot.version,
            snapshot.resources.len()
        );
        snapshot
    }

    /// Fetch the full listing and store it.
    pub async fn refresh(
        &self,
        client: &dyn CatalogClient,
        instance_id: &str,
        policy: &RetryPolicy,
    ) -> Result<Arc<CatalogSnapshot>> {
        let response = with_retry(policy, "List resources", || {
            client.list_resources(instance_id, None)
        })
        .await?;
        let snapshot = self.replace(response.resources);
        info!(
            "Refreshed catalog for {}: {} resources",
            instance_id,
            snapshot.resources.len()
        );
        Ok(snapshot)
    }
}
