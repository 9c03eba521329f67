//! SQLi Sim - in-memory query simulator for injection scanner exercises.
//!
//! Accepts raw, attacker-influenced SQL strings and executes them against three
//! in-memory relations (users, products, orders):
//! - Ordered regex extractors instead of a real grammar
//! - A coarse injection heuristic that returns whole relations
//! - Fail-open handling of anything it cannot recognise
//!
//! The mis-parses are the point. Do not harden them.
//!
//! ```rust
//! use sqli_sim::Database;
//!
//! let db = Database::open();
//! let rows = db.prepare("SELECT * FROM users WHERE id=1 OR 1=1").all();
//! assert_eq!(rows.len(), 4);
//! ```

pub mod config;
pub mod database;
pub mod memory;
pub mod otel;
pub mod query;
pub mod types;

// Re-export main types
pub use database::{Database, Statement};
pub use memory::RelationStore;
pub use types::{Order, OrderView, Product, Row, RunResult, SimError, User};
