//! Access to the remote resource catalog.
//!
//! [`CatalogClient`] is the seam between the sync layer and the runtime.
//! [`RuntimeClient`] talks to the runtime over HTTP; tests substitute their
//! own implementations.

mod http;
mod retry;

pub use http::RuntimeClient;
pub use retry::{with_retry, RetryPolicy};

use crate::error::Result;
use crate::models::{ListResourcesResponse, ResourceKind, ResourceName, ResourceRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of a rename request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameFileRequest {
    pub from_path: String,
    pub to_path: String,
}

/// Parameters of a delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFileRequest {
    pub path: String,
    #[serde(default)]
    pub force: bool,
}

/// Remote catalog operations.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// List resources, optionally restricted to one kind.
    async fn list_resources(
        &self,
        instance_id: &str,
        kind: Option<&ResourceKind>,
    ) -> Result<ListResourcesResponse>;

    /// Fetch a single resource by kind and name.
    async fn get_resource(&self, instance_id: &str, name: &ResourceName) -> Result<ResourceRecord>;

    async fn rename_file(&self, instance_id: &str, request: &RenameFileRequest) -> Result<()>;

    async fn delete_file(&self, instance_id: &str, request: &DeleteFileRequest) -> Result<()>;
}
