//! Catalog Core - client-side synchronization with a runtime's resource catalog.
//!
//! The crate keeps a local view of which project file declares which
//! resource, coordinates renames and deletes against the runtime, and
//! derives dashboard-facing values from the latest catalog listing.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_core::{CatalogContext, SyncConfig};
//!
//! #[tokio::main]
//! async fn main() -> catalog_core::Result<()> {
//!     let ctx = CatalogContext::builder(SyncConfig::new().with_instance_id("default")).build()?;
//!     let mut notifications = ctx.notifications().subscribe();
//!
//!     ctx.refresh().await?;
//!     let outcome = ctx.rename("/models/a.sql", "/models/b.sql").await;
//!     if !outcome.is_completed() {
//!         let notification = notifications.recv().await.ok();
//!         println!("{:?}", notification);
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod locks;
pub mod models;
pub mod notifications;
pub mod paths;
pub mod queue;
pub mod registry;
pub mod selectors;

// Re-export commonly used types
pub use catalog::{CatalogCache, CatalogSnapshot, MemoizedSelector};
pub use client::{CatalogClient, DeleteFileRequest, RenameFileRequest, RetryPolicy, RuntimeClient};
pub use config::{NetworkConfig, QueueConfig, SyncConfig};
pub use context::{CatalogContext, CatalogContextBuilder};
pub use coordinator::{translate_error_message, ActionOutcome, Coordinator};
pub use error::{CatalogError, Result};
pub use locks::{PathGuard, PathLocks};
pub use models::{
    Expression, MetricsViewDimension, MetricsViewMeasure, MetricsViewSpec, Operation,
    ResourceKind, ResourceName, ResourceRecord,
};
pub use notifications::{Notification, NotificationBus, NotificationLevel};
pub use queue::{RequestHandle, RequestQueue};
pub use registry::{FileArtifact, FileArtifactIdentity, FileArtifactRegistry};
