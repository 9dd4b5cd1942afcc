//! Resource records as served by the runtime catalog.
//!
//! Field names follow the runtime's camelCase JSON. Payloads the sync layer
//! never inspects are kept as raw JSON values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a catalog resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceKind {
    Source,
    Model,
    MetricsView,
    Dashboard,
    Component,
    Report,
    Alert,
    Theme,
    Api,
    Connector,
    ProjectParser,
    /// A kind this client does not know about yet.
    Unknown(String),
}

impl ResourceKind {
    /// Fully qualified name used on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            ResourceKind::Source => "rill.runtime.v1.Source",
            ResourceKind::Model => "rill.runtime.v1.Model",
            ResourceKind::MetricsView => "rill.runtime.v1.MetricsView",
            ResourceKind::Dashboard => "rill.runtime.v1.Dashboard",
            ResourceKind::Component => "rill.runtime.v1.Component",
            ResourceKind::Report => "rill.runtime.v1.Report",
            ResourceKind::Alert => "rill.runtime.v1.Alert",
            ResourceKind::Theme => "rill.runtime.v1.Theme",
            ResourceKind::Api => "rill.runtime.v1.API",
            ResourceKind::Connector => "rill.runtime.v1.Connector",
            ResourceKind::ProjectParser => "rill.runtime.v1.ProjectParser",
            ResourceKind::Unknown(raw) => raw,
        }
    }

    /// Parse a kind from its wire name or a short alias (`model`, `metrics_view`).
    pub fn parse(raw: &str) -> Self {
        let short = raw.strip_prefix("rill.runtime.v1.").unwrap_or(raw);
        match short.to_ascii_lowercase().replace('_', "").as_str() {
            "source" => ResourceKind::Source,
            "model" => ResourceKind::Model,
            "metricsview" => ResourceKind::MetricsView,
            "dashboard" => ResourceKind::Dashboard,
            "component" => ResourceKind::Component,
            "report" => ResourceKind::Report,
            "alert" => ResourceKind::Alert,
            "theme" => ResourceKind::Theme,
            "api" => ResourceKind::Api,
            "connector" => ResourceKind::Connector,
            "projectparser" => ResourceKind::ProjectParser,
            _ => ResourceKind::Unknown(raw.to_string()),
        }
    }
}

impl From<String> for ResourceKind {
    fn from(raw: String) -> Self {
        ResourceKind::parse(&raw)
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Kind-qualified resource name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceName {
    pub kind: ResourceKind,
    pub name: String,
}

impl ResourceName {
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMeta {
    pub name: ResourceName,
    #[serde(default)]
    pub file_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconcile_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsViewMeasure {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_preset: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsViewDimension {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Measures and dimensions of a metrics view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsViewSpec {
    /// Table (usually a model) the metrics view reads from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measures: Option<Vec<MetricsViewMeasure>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<MetricsViewDimension>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsViewState {
    /// Last spec that compiled, absent while the view is invalid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_spec: Option<MetricsViewSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsViewResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<MetricsViewSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<MetricsViewState>,
}

/// A resource as listed by the runtime catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub meta: ResourceMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_view: Option<MetricsViewResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<serde_json::Value>,
}

impl ResourceRecord {
    /// Bare record with only identity fields set.
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            meta: ResourceMeta {
                name: ResourceName::new(kind, name),
                file_paths: Vec::new(),
                reconcile_error: None,
            },
            metrics_view: None,
            source: None,
            model: None,
            dashboard: None,
        }
    }

    pub fn kind(&self) -> &ResourceKind {
        &self.meta.name.kind
    }

    pub fn name(&self) -> &str {
        &self.meta.name.name
    }

    pub fn metrics_view_spec(&self) -> Option<&MetricsViewSpec> {
        self.metrics_view.as_ref().and_then(|mv| mv.spec.as_ref())
    }

    pub fn valid_spec(&self) -> Option<&MetricsViewSpec> {
        self.metrics_view
            .as_ref()
            .and_then(|mv| mv.state.as_ref())
            .and_then(|state| state.valid_spec.as_ref())
    }

    pub fn has_dashboard(&self) -> bool {
        self.dashboard.is_some()
    }

    /// Reconcile errors reported by the runtime.
    pub fn errors(&self) -> Option<&str> {
        self.meta
            .reconcile_error
            .as_deref()
            .filter(|err| !err.is_empty())
    }
}

/// Response of the list operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResourcesResponse {
    #[serde(default)]
    pub resources: Vec<ResourceRecord>,
}

/// Response of the single-resource fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetResourceResponse {
    pub resource: ResourceRecord,
}
