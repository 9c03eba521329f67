//! Compatibility facade.
//!
//! Callers prepare a raw statement and then pick `get`, `all` or `run` without
//! first knowing whether it is a read or a write.
//!
//! ```rust
//! use sqli_sim::Database;
//!
//! let db = Database::open();
//! let result = db
//!     .prepare("INSERT INTO orders (user_id, product_id, quantity, total_price) VALUES (2, 1, 1, 1299.99)")
//!     .run();
//! assert_eq!(result.changes, 1);
//!
//! let order = db.prepare("SELECT * FROM orders").get().unwrap();
//! assert_eq!(order.as_order().unwrap().username, "john_doe");
//! ```

use crate::memory::RelationStore;
use crate::query::{self, Outcome};
use crate::types::{Row, RunResult};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Single-instance owner of the relation store.
///
/// One lock guards all three relations so that id assignment is atomic.
#[derive(Debug)]
pub struct Database {
    store: Mutex<RelationStore>,
}

impl Database {
    /// Open a database with the bootstrap rows.
    pub fn open() -> Self {
        Self::with_store(RelationStore::seeded())
    }

    /// Wrap an existing store.
    pub fn with_store(store: RelationStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Bind a statement for later execution.
    pub fn prepare(&self, sql: impl Into<String>) -> Statement<'_> {
        Statement {
            db: self,
            sql: sql.into(),
        }
    }

    /// Execute a raw statement.
    pub fn execute(&self, sql: &str) -> Outcome {
        query::execute(&mut self.lock(), sql)
    }

    /// Copy of the current store.
    pub fn snapshot(&self) -> RelationStore {
        self.lock().clone()
    }

    // A panic mid-statement cannot leave the store half-written, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, RelationStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::open()
    }
}

/// A statement bound to a database.
#[derive(Debug, Clone)]
pub struct Statement<'db> {
    db: &'db Database,
    sql: String,
}

impl Statement<'_> {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// First row, or `None` when nothing matched.
    pub fn get(&self) -> Option<Row> {
        self.all().into_iter().next()
    }

    /// Every row. An INSERT still takes effect but returns no rows.
    pub fn all(&self) -> Vec<Row> {
        self.db.execute(&self.sql).into_rows()
    }

    /// Mutation result. Reads report `{ 0, 0 }`.
    pub fn run(&self) -> RunResult {
        self.db.execute(&self.sql).into_run_result()
    }
}
