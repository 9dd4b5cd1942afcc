//! Filters and lookups over a resource listing.

use crate::models::{MetricsViewSpec, ResourceKind, ResourceRecord};

/// Metrics views whose spec currently compiles.
pub fn valid_dashboards(resources: &[ResourceRecord]) -> Vec<&ResourceRecord> {
    resources
        .iter()
        .filter(|r| *r.kind() == ResourceKind::MetricsView && r.valid_spec().is_some())
        .collect()
}

/// Valid metrics views plus every custom dashboard.
///
/// Custom dashboards do not report a validity state yet, so all of them are
/// included.
pub fn valid_visualizations(resources: &[ResourceRecord]) -> Vec<&ResourceRecord> {
    resources
        .iter()
        .filter(|r| {
            (*r.kind() == ResourceKind::MetricsView && r.valid_spec().is_some())
                || r.has_dashboard()
        })
        .collect()
}

/// Metrics views built on `model_name`.
pub fn dashboards_for_model<'a>(
    resources: &'a [ResourceRecord],
    model_name: &str,
) -> Vec<&'a ResourceRecord> {
    resources
        .iter()
        .filter(|r| {
            *r.kind() == ResourceKind::MetricsView
                && r.metrics_view_spec().and_then(|s| s.table.as_deref()) == Some(model_name)
        })
        .collect()
}

pub fn find_resource<'a>(
    resources: &'a [ResourceRecord],
    kind: &ResourceKind,
    name: &str,
) -> Option<&'a ResourceRecord> {
    resources
        .iter()
        .find(|r| r.kind() == kind && r.name() == name)
}

/// The metrics view backing dashboard `name`.
pub fn dashboard<'a>(resources: &'a [ResourceRecord], name: &str) -> Option<&'a ResourceRecord> {
    find_resource(resources, &ResourceKind::MetricsView, name)
}

/// Valid spec of metrics view `name`. Only meant for rendering a dashboard;
/// editors should read [`dashboard`] to see invalid specs too.
pub fn metrics_view_valid_spec<'a>(
    resources: &'a [ResourceRecord],
    name: &str,
) -> Option<&'a MetricsViewSpec> {
    dashboard(resources, name).and_then(ResourceRecord::valid_spec)
}
