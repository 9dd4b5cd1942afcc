//! Explicit wiring of the registry, queue, bus, cache and client.
//!
//! Nothing in this crate is global. Each [`CatalogContext`] owns one set of
//! components; tests build as many isolated contexts as they like.

use crate::catalog::{CatalogCache, CatalogSnapshot, MemoizedSelector};
use crate::client::{CatalogClient, RetryPolicy, RuntimeClient};
use crate::config::SyncConfig;
use crate::coordinator::{ActionOutcome, Coordinator};
use crate::error::Result;
use crate::models::{ResourceKind, ResourceRecord};
use crate::notifications::NotificationBus;
use crate::queue::RequestQueue;
use crate::registry::FileArtifactRegistry;
use std::sync::Arc;
use tracing::debug;

/// One catalog session against one runtime instance.
pub struct CatalogContext {
    config: SyncConfig,
    registry: Arc<FileArtifactRegistry>,
    queue: Arc<RequestQueue>,
    notifications: NotificationBus,
    cache: Arc<CatalogCache>,
    client: Arc<dyn CatalogClient>,
    coordinator: Coordinator,
}

impl CatalogContext {
    pub fn builder(config: SyncConfig) -> CatalogContextBuilder {
        CatalogContextBuilder::new(config)
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn instance_id(&self) -> &str {
        &self.config.instance_id
    }

    pub fn registry(&self) -> &Arc<FileArtifactRegistry> {
        &self.registry
    }

    pub fn queue(&self) -> &Arc<RequestQueue> {
        &self.queue
    }

    pub fn notifications(&self) -> &NotificationBus {
        &self.notifications
    }

    pub fn cache(&self) -> &Arc<CatalogCache> {
        &self.cache
    }

    pub fn client(&self) -> &Arc<dyn CatalogClient> {
        &self.client
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Re-list the catalog and bind every listed file path to its resource.
    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>> {
        let policy = RetryPolicy::from_config(&self.config);
        let snapshot = self
            .cache
            .refresh(self.client.as_ref(), self.instance_id(), &policy)
            .await?;
        let bound = self.registry.bind_resources(&snapshot.resources);
        debug!("Bound {} file paths from catalog v{}", bound, snapshot.version);
        Ok(snapshot)
    }

    /// Selector over this context's cache, memoized on the structural key.
    pub fn selector<T, F>(&self, select: F) -> MemoizedSelector<T>
    where
        F: Fn(&[ResourceRecord]) -> T + Send + Sync + 'static,
    {
        MemoizedSelector::new(self.cache.subscribe(), select)
    }

    pub async fn rename(&self, from_path: &str, to_path: &str) -> ActionOutcome {
        self.coordinator
            .rename_file_artifact(self.instance_id(), from_path, to_path)
            .await
    }

    pub async fn delete(&self, path: &str, force: bool) -> ActionOutcome {
        self.coordinator
            .delete_file_artifact(self.instance_id(), path, force)
            .await
    }

    pub async fn fetch(&self, kind: ResourceKind, name: &str) -> Option<ResourceRecord> {
        self.coordinator
            .fetch_resource(self.instance_id(), kind, name)
            .await
    }
}

/// Builder for [`CatalogContext`].
pub struct CatalogContextBuilder {
    config: SyncConfig,
    client: Option<Arc<dyn CatalogClient>>,
    notifications: Option<NotificationBus>,
}

impl CatalogContextBuilder {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            client: None,
            notifications: None,
        }
    }

    /// Use `client` instead of an HTTP client built from the config.
    pub fn with_client(mut self, client: Arc<dyn CatalogClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Publish into an existing bus, e.g. one shared with other contexts.
    pub fn with_notification_bus(mut self, bus: NotificationBus) -> Self {
        self.notifications = Some(bus);
        self
    }

    pub fn build(self) -> Result<CatalogContext> {
        let client: Arc<dyn CatalogClient> = match self.client {
            Some(client) => client,
            None => Arc::new(RuntimeClient::from_config(&self.config)?),
        };
        let notifications = self
            .notifications
            .unwrap_or_else(|| NotificationBus::new(self.config.notification_capacity));
        let registry = Arc::new(FileArtifactRegistry::new());
        let queue = Arc::new(RequestQueue::new());

        let coordinator = Coordinator::new(
            registry.clone(),
            queue.clone(),
            notifications.clone(),
            client.clone(),
        )
        .with_rollback_optimistic_names(self.config.rollback_optimistic_names);

        Ok(CatalogContext {
            config: self.config,
            registry,
            queue,
            notifications,
            cache: Arc::new(CatalogCache::new()),
            client,
            coordinator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;

    #[test]
    fn test_build_with_default_http_client() {
        let ctx = CatalogContext::builder(SyncConfig::new().with_instance_id("proj"))
            .build()
            .unwrap();
        assert_eq!(ctx.instance_id(), "proj");
        assert!(ctx.registry().is_empty());
        assert!(ctx.queue().is_empty());
        assert_eq!(ctx.cache().version(), 0);
    }

    #[test]
    fn test_build_rejects_bad_url() {
        let result = CatalogContext::builder(SyncConfig::new().with_runtime_url("not a url")).build();
        assert!(matches!(result, Err(CatalogError::Config { .. })));
    }

    #[test]
    fn test_contexts_are_isolated() {
        let a = CatalogContext::builder(SyncConfig::new()).build().unwrap();
        let b = CatalogContext::builder(SyncConfig::new()).build().unwrap();
        a.registry().get_file_artifact("/models/a.sql");
        assert_eq!(a.registry().len(), 1);
        assert!(b.registry().is_empty());
    }

    #[test]
    fn test_shared_notification_bus() {
        let bus = NotificationBus::new(8);
        let _rx = bus.subscribe();
        let ctx = CatalogContext::builder(SyncConfig::new())
            .with_notification_bus(bus.clone())
            .build()
            .unwrap();
        assert_eq!(ctx.notifications().subscriber_count(), 1);
    }
}
