//! Request queue for in-flight network operations.
//!
//! Requests are attributed to a resource name. Evicting a name guarantees
//! that results of its pending requests are discarded; it does not abort
//! the underlying network call.

mod handle;
mod request_queue;

pub use handle::{EvictedError, RequestHandle};
pub use request_queue::{QueuedRequest, RequestQueue};
