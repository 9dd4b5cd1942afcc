//! Cached view of the remote catalog.
//!
//! The cache holds one versioned snapshot of the resource listing. Derived
//! views subscribe to it and recompute when the version moves.

mod memo;
mod snapshot;

pub use memo::{structural_key, MemoizedSelector, StructuralKey};
pub use snapshot::{CatalogCache, CatalogSnapshot};
