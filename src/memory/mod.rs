//! In-memory relations and the read-time join.

mod join;
mod store;

pub use join::{join_orders, UNKNOWN};
pub use store::{RelationCounts, RelationStore};
