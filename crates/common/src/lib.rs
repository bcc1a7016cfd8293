//! Shared value types used by the store, domain and API crates.

mod status;
mod types;

pub use status::{OrderStatus, UnknownOrderStatus};
pub use types::ConsignmentId;
