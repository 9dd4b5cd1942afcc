//! Wire models shared by the client, cache and selectors.

mod expression;
mod resource;

pub use expression::{Condition, Expression, Operation};
pub use resource::{
    GetResourceResponse, ListResourcesResponse, MetricsViewDimension, MetricsViewMeasure,
    MetricsViewResource, MetricsViewSpec, MetricsViewState, ResourceKind, ResourceMeta,
    ResourceName, ResourceRecord,
};
