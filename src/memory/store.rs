//! Relation store: three ordered collections with per-table id counters.
//!
//! Pure data. No query logic lives here.

use crate::types::{Order, Product, User};
use chrono::Utc;
use serde::Serialize;

/// Row counts per relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelationCounts {
    pub users: usize,
    pub products: usize,
    pub orders: usize,
}

/// Owner of the users, products and orders relations.
///
/// Identifiers are assigned from per-table counters that only ever increase.
#[derive(Debug, Clone)]
pub struct RelationStore {
    users: Vec<User>,
    products: Vec<Product>,
    orders: Vec<Order>,
    next_user_id: i64,
    next_product_id: i64,
    next_order_id: i64,
}

impl RelationStore {
    /// Store with no rows and all counters at 1.
    pub fn empty() -> Self {
        Self {
            users: Vec::new(),
            products: Vec::new(),
            orders: Vec::new(),
            next_user_id: 1,
            next_product_id: 1,
            next_order_id: 1,
        }
    }

    /// Store populated with the fixed bootstrap rows.
    pub fn seeded() -> Self {
        let mut store = Self::empty();

        for (username, email, password, role) in [
            ("admin", "admin@example.com", "admin123", "admin"),
            ("john_doe", "john@example.com", "password123", "user"),
            ("jane_smith", "jane@example.com", "secret456", "user"),
            ("bob_wilson", "bob@example.com", "qwerty789", "user"),
        ] {
            store.append_user(username, email, password, role);
        }

        for (name, description, price, category, stock) in [
            ("Laptop Pro", "High-performance laptop", 1299.99, "electronics", 10),
            ("Security Book", "Web Application Security Guide", 49.99, "books", 25),
            ("Wireless Mouse", "Ergonomic wireless mouse", 29.99, "accessories", 50),
            ("Keyboard", "Mechanical gaming keyboard", 89.99, "accessories", 15),
        ] {
            store.append_product(name, description, price, category, stock);
        }

        store
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn counts(&self) -> RelationCounts {
        RelationCounts {
            users: self.users.len(),
            products: self.products.len(),
            orders: self.orders.len(),
        }
    }

    /// Append a user and return its identifier.
    pub fn append_user(&mut self, username: &str, email: &str, password: &str, role: &str) -> i64 {
        let id = self.next_user_id;
        self.next_user_id += 1;
        self.users.push(User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
            created_at: Utc::now(),
        });
        id
    }

    /// Append a product and return its identifier.
    pub fn append_product(
        &mut self,
        name: &str,
        description: &str,
        price: f64,
        category: &str,
        stock: i64,
    ) -> i64 {
        let id = self.next_product_id;
        self.next_product_id += 1;
        self.products.push(Product {
            id,
            name: name.to_string(),
            description: description.to_string(),
            price,
            category: category.to_string(),
            stock,
            created_at: Utc::now(),
        });
        id
    }

    /// Append a pending order and return its identifier.
    ///
    /// References are not checked against users or products.
    pub fn append_order(&mut self, user_id: i64, product_id: i64, quantity: i64, total_price: f64) -> i64 {
        let id = self.next_order_id;
        self.next_order_id += 1;
        self.orders.push(Order {
            id,
            user_id,
            product_id,
            quantity,
            total_price,
            status: "pending".to_string(),
            created_at: Utc::now(),
        });
        id
    }
}

impl Default for RelationStore {
    fn default() -> Self {
        Self::seeded()
    }
}
