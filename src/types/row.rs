//! Row types for the three relations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// User row. Passwords are stored in clear text on purpose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

/// Order row. `user_id` and `product_id` are never validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub total_price: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Denormalized order as produced by the join at read time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub username: String,
    pub product_name: String,
}

/// Any row a SELECT can return.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Row {
    User(User),
    Product(Product),
    Order(OrderView),
}

impl Row {
    /// Identifier of the underlying row.
    pub fn id(&self) -> i64 {
        match self {
            Row::User(u) => u.id,
            Row::Product(p) => p.id,
            Row::Order(o) => o.order.id,
        }
    }

    pub fn as_user(&self) -> Option<&User> {
        match self {
            Row::User(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_product(&self) -> Option<&Product> {
        match self {
            Row::Product(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_order(&self) -> Option<&OrderView> {
        match self {
            Row::Order(o) => Some(o),
            _ => None,
        }
    }
}

/// Outcome of a mutating statement.
///
/// Malformed inserts report `{ last_insert_rowid: 0, changes: 0 }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub last_insert_rowid: i64,
    pub changes: usize,
}

impl RunResult {
    /// One row inserted with the given identifier.
    pub fn inserted(id: i64) -> Self {
        Self {
            last_insert_rowid: id,
            changes: 1,
        }
    }

    /// Nothing changed.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Field lookup used by predicate evaluation.
pub trait Record {
    /// Return the named field as a JSON value, or `None` if the row has no such field.
    fn field(&self, name: &str) -> Option<Value>;

    fn id(&self) -> i64;
}

impl Record for User {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(json!(self.id)),
            "username" => Some(json!(self.username)),
            "email" => Some(json!(self.email)),
            "password" => Some(json!(self.password)),
            "role" => Some(json!(self.role)),
            _ => None,
        }
    }

    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Product {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(json!(self.id)),
            "name" => Some(json!(self.name)),
            "description" => Some(json!(self.description)),
            "price" => Some(json!(self.price)),
            "category" => Some(json!(self.category)),
            "stock" => Some(json!(self.stock)),
            _ => None,
        }
    }

    fn id(&self) -> i64 {
        self.id
    }
}
