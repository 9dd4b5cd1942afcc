//! HTTP client for the runtime's REST catalog surface.

use super::{CatalogClient, DeleteFileRequest, RenameFileRequest};
use crate::config::{NetworkConfig, SyncConfig};
use crate::error::{CatalogError, Result};
use crate::models::{
    GetResourceResponse, ListResourcesResponse, ResourceKind, ResourceName, ResourceRecord,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Error body returned by the runtime.
#[derive(Debug, Deserialize)]
struct RuntimeErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Catalog client backed by the runtime's HTTP API.
#[derive(Debug, Clone)]
pub struct RuntimeClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl RuntimeClient {
    /// Create a client for the runtime at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, NetworkConfig::REQUEST_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::Config {
                message: format!("Runtime URL cannot be a base: {}", base_url),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| CatalogError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                cause: None,
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        Self::with_timeout(&config.runtime_url, config.request_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn transport_error(&self, err: reqwest::Error) -> CatalogError {
        CatalogError::from_reqwest(err, self.timeout)
    }

    /// `{base}/v1/instances/{instance_id}/{segments...}` with each segment
    /// percent-encoded.
    fn endpoint(&self, instance_id: &str, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::Config {
                message: format!("Runtime URL cannot be a base: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(["v1", "instances", instance_id])
            .extend(segments);
        Ok(url)
    }

    /// Turn non-success responses into [`CatalogError::Remote`].
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<RuntimeErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        Err(CatalogError::Remote {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl CatalogClient for RuntimeClient {
    async fn list_resources(
        &self,
        instance_id: &str,
        kind: Option<&ResourceKind>,
    ) -> Result<ListResourcesResponse> {
        let url = self.endpoint(instance_id, &["resources"])?;
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        if let Some(kind) = kind {
            request = request.query(&[("kind", kind.as_str())]);
        }
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = Self::check_response(response).await?;
        response
            .json::<ListResourcesResponse>()
            .await
            .map_err(|e| self.transport_error(e))
    }

    async fn get_resource(&self, instance_id: &str, name: &ResourceName) -> Result<ResourceRecord> {
        let url = self.endpoint(instance_id, &["resource"])?;
        debug!("GET {} ({})", url, name.name);

        let response = self
            .client
            .get(url)
            .query(&[("name.kind", name.kind.as_str()), ("name.name", name.name.as_str())])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = Self::check_response(response).await?;
        let body = response
            .json::<GetResourceResponse>()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(body.resource)
    }

    async fn rename_file(&self, instance_id: &str, request: &RenameFileRequest) -> Result<()> {
        let url = self.endpoint(instance_id, &["files", "rename"])?;
        debug!("POST {} ({} -> {})", url, request.from_path, request.to_path);

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Self::check_response(response).await?;
        Ok(())
    }

    async fn delete_file(&self, instance_id: &str, request: &DeleteFileRequest) -> Result<()> {
        let url = self.endpoint(instance_id, &["files", "entry"])?;
        debug!("DELETE {} ({}, force={})", url, request.path, request.force);

        let force = if request.force { "true" } else { "false" };
        let response = self
            .client
            .delete(url)
            .query(&[("path", request.path.as_str()), ("force", force)])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Self::check_response(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let client = RuntimeClient::new("http://localhost:9009").unwrap();
        let url = client.endpoint("default", &["files", "rename"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9009/v1/instances/default/files/rename"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_instance() {
        let client = RuntimeClient::new("http://localhost:9009/runtime/").unwrap();
        let url = client.endpoint("my instance", &["resources"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9009/runtime/v1/instances/my%20instance/resources"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            RuntimeClient::new("not a url"),
            Err(CatalogError::Config { .. })
        ));
        assert!(matches!(
            RuntimeClient::new("mailto:ops@example.com"),
            Err(CatalogError::Config { .. })
        ));
    }

    #[test]
    fn test_rename_body_is_camel_case() {
        let body = serde_json::to_value(RenameFileRequest {
            from_path: "/models/a.sql".into(),
            to_path: "/models/b.sql".into(),
        })
        .unwrap();
        assert_eq!(body["fromPath"], "/models/a.sql");
        assert_eq!(body["toPath"], "/models/b.sql");
    }
}
