//! Read-time join of orders with their user and product.

use crate::memory::RelationStore;
use crate::types::OrderView;

/// Placeholder for a dangling user or product reference.
pub const UNKNOWN: &str = "unknown";

/// Denormalize every order in the store.
///
/// Linear scan per order, recomputed on every call.
pub fn join_orders(store: &RelationStore) -> Vec<OrderView> {
    store
        .orders()
        .iter()
        .map(|order| {
            let username = store
                .users()
                .iter()
                .find(|u| u.id == order.user_id)
                .map(|u| u.username.clone())
                .unwrap_or_else(|| UNKNOWN.to_string());

            let product_name = store
                .products()
                .iter()
                .find(|p| p.id == order.product_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN.to_string());

            OrderView {
                order: order.clone(),
                username,
                product_name,
            }
        })
        .collect()
}
