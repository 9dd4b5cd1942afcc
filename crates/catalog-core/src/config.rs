//! Centralized configuration for the catalog synchronization layer.
//!
//! Constant groups hold fixed tuning values; [`SyncConfig`] carries the
//! per-deployment settings a host application chooses.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
    pub const USER_AGENT: &'static str = "catalog-sync/0.1";
    pub const DEFAULT_RUNTIME_URL: &'static str = "http://localhost:9009";
    pub const LIST_MAX_ATTEMPTS: u32 = 3;
    pub const LIST_RETRY_BASE_DELAY: Duration = Duration::from_millis(250);
    pub const LIST_RETRY_MAX_DELAY: Duration = Duration::from_secs(5);
}

/// Request queue configuration.
pub struct QueueConfig;

impl QueueConfig {
    /// Key used for single-resource fetches.
    pub const FETCH_KEY: &'static str = "get-resource";
}

/// Notification bus configuration.
pub struct NotificationConfig;

impl NotificationConfig {
    /// Buffered notifications per subscriber before the oldest are dropped.
    pub const CHANNEL_CAPACITY: usize = 64;
}

/// Settings for a catalog context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SyncConfig {
    /// Base URL of the runtime serving the catalog.
    pub runtime_url: String,
    /// Instance the catalog belongs to.
    pub instance_id: String,
    /// Timeout applied to every runtime request.
    pub request_timeout: Duration,
    /// Attempts for idempotent list requests.
    pub list_max_attempts: u32,
    /// Undo the optimistic name copy when a rename fails.
    pub rollback_optimistic_names: bool,
    /// Capacity of the notification broadcast channel.
    pub notification_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            runtime_url: NetworkConfig::DEFAULT_RUNTIME_URL.to_string(),
            instance_id: "default".to_string(),
            request_timeout: NetworkConfig::REQUEST_TIMEOUT,
            list_max_attempts: NetworkConfig::LIST_MAX_ATTEMPTS,
            rollback_optimistic_names: false,
            notification_capacity: NotificationConfig::CHANNEL_CAPACITY,
        }
    }
}

impl SyncConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the runtime base URL.
    pub fn with_runtime_url(mut self, url: impl Into<String>) -> Self {
        self.runtime_url = url.into();
        self
    }

    /// Set the instance id.
    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = instance_id.into();
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the number of attempts for list requests.
    pub fn with_list_max_attempts(mut self, attempts: u32) -> Self {
        self.list_max_attempts = attempts.max(1);
        self
    }

    /// Enable or disable rollback of optimistic rename writes.
    pub fn with_rollback_optimistic_names(mut self, enable: bool) -> Self {
        self.rollback_optimistic_names = enable;
        self
    }

    /// Set the notification channel capacity.
    pub fn with_notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = capacity.max(1);
        self
    }
}
