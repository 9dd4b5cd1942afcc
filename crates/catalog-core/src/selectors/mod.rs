//! Pure derivations over a resource listing or metrics view spec.
//!
//! Nothing here fails: missing inputs give empty results or fallbacks.
//! Recomputation on catalog changes is driven by
//! [`MemoizedSelector`](crate::catalog::MemoizedSelector).

mod filters;
mod measures;
mod resources;

pub use filters::{filter_expressions, filters_for_other_dimensions};
pub use measures::{
    all_measures, dimension_by_name, has_time_series, measure_label, meta_measure,
    visible_measures,
};
pub use resources::{
    dashboard, dashboards_for_model, find_resource, metrics_view_valid_spec, valid_dashboards,
    valid_visualizations,
};
