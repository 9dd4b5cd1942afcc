//! Measure and dimension lookups on a metrics view spec.
//!
//! Every function accepts a missing spec and answers with an empty list or
//! a fallback value.

use crate::models::{MetricsViewDimension, MetricsViewMeasure, MetricsViewSpec};
use std::collections::HashSet;

pub fn all_measures(spec: Option<&MetricsViewSpec>) -> &[MetricsViewMeasure] {
    spec.and_then(|s| s.measures.as_deref()).unwrap_or_default()
}

/// Measures named in `visible_names`, in the spec's order.
pub fn visible_measures<'a>(
    spec: Option<&'a MetricsViewSpec>,
    visible_names: &HashSet<String>,
) -> Vec<&'a MetricsViewMeasure> {
    all_measures(spec)
        .iter()
        .filter(|m| !m.name.is_empty() && visible_names.contains(&m.name))
        .collect()
}

pub fn meta_measure<'a>(
    spec: Option<&'a MetricsViewSpec>,
    measure_name: &str,
) -> Option<&'a MetricsViewMeasure> {
    all_measures(spec).iter().find(|m| m.name == measure_name)
}

/// Display label of a measure, or its name when the label is absent.
/// An empty label is returned as is.
pub fn measure_label(spec: Option<&MetricsViewSpec>, measure_name: &str) -> String {
    meta_measure(spec, measure_name)
        .and_then(|m| m.label.as_deref())
        .unwrap_or(measure_name)
        .to_string()
}

/// Dimension `dimension_name` with `column` filled in.
///
/// Older specs used the dimension name as its column, so a missing column
/// falls back to the name. An empty column is kept.
pub fn dimension_by_name(
    spec: Option<&MetricsViewSpec>,
    dimension_name: &str,
) -> Option<MetricsViewDimension> {
    let dimension = spec
        .and_then(|s| s.dimensions.as_deref())
        .unwrap_or_default()
        .iter()
        .find(|d| d.name == dimension_name)?;

    let mut dimension = dimension.clone();
    if dimension.column.is_none() {
        dimension.column = Some(dimension.name.clone());
    }
    Some(dimension)
}

/// Whether the metrics view declares a time dimension.
pub fn has_time_series(spec: Option<&MetricsViewSpec>) -> bool {
    spec.and_then(|s| s.time_dimension.as_deref())
        .is_some_and(|t| !t.is_empty())
}
