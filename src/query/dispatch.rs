//! Statement dispatcher and per-relation handlers.

use super::extract::{order_values, product_predicate, product_values, user_predicate, user_values};
use super::heuristic::{detect_injection, detect_tautology};
use crate::memory::{join_orders, RelationStore};
use crate::otel::{query_span, record_query_metrics};
use crate::types::{Row, RunResult};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Leading keyword of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Unknown,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Unknown => "unknown",
        }
    }
}

/// One of the three in-memory relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Users,
    Products,
    Orders,
}

impl Relation {
    /// Recognition order when several table names appear.
    pub const ALL: [Relation; 3] = [Relation::Users, Relation::Products, Relation::Orders];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Products => "products",
            Self::Orders => "orders",
        }
    }
}

/// Result of classifying a raw statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified {
    pub kind: StatementKind,
    pub relation: Option<Relation>,
}

/// What a dispatched statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rows(Vec<Row>),
    Mutation(RunResult),
}

impl Outcome {
    /// Rows of a read; a mutation yields none.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Outcome::Rows(rows) => rows,
            Outcome::Mutation(_) => Vec::new(),
        }
    }

    /// Mutation result of a write; a read reports nothing changed.
    pub fn into_run_result(self) -> RunResult {
        match self {
            Outcome::Rows(_) => RunResult::none(),
            Outcome::Mutation(result) => result,
        }
    }
}

fn table_pattern(clause: &str, relation: Relation) -> Regex {
    Regex::new(&format!(r"{}\s+{}", clause, relation.as_str())).expect("static pattern")
}

static FROM_TABLE: LazyLock<[Regex; 3]> =
    LazyLock::new(|| Relation::ALL.map(|r| table_pattern("from", r)));
static INTO_TABLE: LazyLock<[Regex; 3]> =
    LazyLock::new(|| Relation::ALL.map(|r| table_pattern("into", r)));

/// Classify by leading keyword, then by which table follows FROM / INTO.
pub fn classify(sql: &str) -> Classified {
    let lower = sql.to_lowercase();
    let lower = lower.trim_start();

    let (kind, patterns) = if lower.starts_with("select") {
        (StatementKind::Select, &*FROM_TABLE)
    } else if lower.starts_with("insert") {
        (StatementKind::Insert, &*INTO_TABLE)
    } else {
        return Classified {
            kind: StatementKind::Unknown,
            relation: None,
        };
    };

    let relation = Relation::ALL
        .into_iter()
        .zip(patterns.iter())
        .find(|(_, re)| re.is_match(lower))
        .map(|(relation, _)| relation);

    Classified { kind, relation }
}

/// Execute a raw statement against the store.
///
/// Never fails: unrecognised statements yield no rows, malformed inserts
/// report nothing changed.
pub fn execute(store: &mut RelationStore, sql: &str) -> Outcome {
    let Classified { kind, relation } = classify(sql);
    let span = query_span(kind, relation.map(|r| r.as_str()), sql);
    let _guard = span.enter();

    let outcome = match (kind, relation) {
        (StatementKind::Select, Some(Relation::Users)) => Outcome::Rows(select_users(store, sql)),
        (StatementKind::Select, Some(Relation::Products)) => {
            Outcome::Rows(select_products(store, sql))
        }
        (StatementKind::Select, Some(Relation::Orders)) => Outcome::Rows(select_orders(store)),
        (StatementKind::Insert, Some(Relation::Users)) => Outcome::Mutation(insert_user(store, sql)),
        (StatementKind::Insert, Some(Relation::Products)) => {
            Outcome::Mutation(insert_product(store, sql))
        }
        (StatementKind::Insert, Some(Relation::Orders)) => {
            Outcome::Mutation(insert_order(store, sql))
        }
        _ => {
            debug!(kind = kind.as_str(), "Unrecognised statement");
            Outcome::Rows(Vec::new())
        }
    };

    match &outcome {
        Outcome::Rows(rows) => record_query_metrics(Some(rows.len()), None),
        Outcome::Mutation(result) => record_query_metrics(None, Some(result.changes)),
    }

    outcome
}

fn select_users(store: &RelationStore, sql: &str) -> Vec<Row> {
    if let Some(trigger) = detect_injection(sql) {
        warn!(relation = "users", trigger = trigger.as_str(), "SQL injection detected");
        return store.users().iter().cloned().map(Row::User).collect();
    }

    match user_predicate(sql) {
        Some(pred) => pred.filter(store.users()).into_iter().map(Row::User).collect(),
        None => store.users().iter().cloned().map(Row::User).collect(),
    }
}

fn select_products(store: &RelationStore, sql: &str) -> Vec<Row> {
    if let Some(trigger) = detect_tautology(sql) {
        warn!(relation = "products", trigger = trigger.as_str(), "SQL injection detected");
        return store.products().iter().cloned().map(Row::Product).collect();
    }

    match product_predicate(sql) {
        Some(pred) => pred
            .filter(store.products())
            .into_iter()
            .map(Row::Product)
            .collect(),
        None => store.products().iter().cloned().map(Row::Product).collect(),
    }
}

/// Orders ignore every predicate and always return the joined view.
fn select_orders(store: &RelationStore) -> Vec<Row> {
    join_orders(store).into_iter().map(Row::Order).collect()
}

fn insert_user(store: &mut RelationStore, sql: &str) -> RunResult {
    match user_values(sql) {
        Some(v) => {
            let id = store.append_user(&v.username, &v.email, &v.password, &v.role);
            info!(relation = "users", id, "Row inserted");
            RunResult::inserted(id)
        }
        None => malformed("users"),
    }
}

fn insert_product(store: &mut RelationStore, sql: &str) -> RunResult {
    match product_values(sql) {
        Some(v) => {
            let id = store.append_product(&v.name, &v.description, v.price, &v.category, v.stock);
            info!(relation = "products", id, "Row inserted");
            RunResult::inserted(id)
        }
        None => malformed("products"),
    }
}

fn insert_order(store: &mut RelationStore, sql: &str) -> RunResult {
    match order_values(sql) {
        Some(v) => {
            let id = store.append_order(v.user_id, v.product_id, v.quantity, v.total_price);
            info!(relation = "orders", id, "Row inserted");
            RunResult::inserted(id)
        }
        None => malformed("orders"),
    }
}

fn malformed(relation: &str) -> RunResult {
    debug!(relation, "VALUES list did not match; insert skipped");
    RunResult::none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            classify("  SELECT * FROM users WHERE id = 1"),
            Classified {
                kind: StatementKind::Select,
                relation: Some(Relation::Users)
            }
        );
        assert_eq!(
            classify("insert INTO Orders (user_id) VALUES (1)").relation,
            Some(Relation::Orders)
        );
        assert_eq!(
            classify("SELECT * FROM customers"),
            Classified {
                kind: StatementKind::Select,
                relation: None
            }
        );
        assert_eq!(classify("DELETE FROM users").kind, StatementKind::Unknown);
    }

    #[test]
    fn test_classify_multiline_join() {
        let sql = "\n  SELECT o.*, u.username FROM orders o\n  JOIN users u ON o.user_id = u.id";
        assert_eq!(classify(sql).relation, Some(Relation::Orders));
    }

    #[test]
    fn test_unknown_statement_is_noop() {
        let mut store = RelationStore::seeded();
        let before = store.counts();

        assert_eq!(execute(&mut store, "DROP TABLE users"), Outcome::Rows(vec![]));
        assert_eq!(
            execute(&mut store, "INSERT INTO customers VALUES ('a', 'b', 'c', 'd')"),
            Outcome::Rows(vec![])
        );
        assert_eq!(store.counts(), before);
    }

    #[test]
    fn test_role_filter() {
        let mut store = RelationStore::seeded();
        let rows = execute(&mut store, "SELECT * FROM users WHERE role = 'admin'").into_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].as_user().map(|u| u.username.as_str()), Some("admin"));
    }

    #[test]
    fn test_injection_overrides_id() {
        let mut store = RelationStore::seeded();
        let rows = execute(&mut store, "SELECT * FROM users WHERE id=1 OR 1=1").into_rows();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_product_injection() {
        let mut store = RelationStore::seeded();
        let rows = execute(
            &mut store,
            "SELECT * FROM products WHERE 1=1 AND category = 'books'",
        )
        .into_rows();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_insert_then_lookup() {
        let mut store = RelationStore::seeded();
        let result = execute(
            &mut store,
            "INSERT INTO users (username, email, password, role) VALUES ('eve', 'eve@example.com', 'pw', 'user')",
        )
        .into_run_result();
        assert_eq!(result, RunResult::inserted(5));

        let rows = execute(&mut store, "SELECT * FROM users WHERE id = 5").into_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].as_user().map(|u| u.email.as_str()), Some("eve@example.com"));
    }

    #[test]
    fn test_malformed_insert() {
        let mut store = RelationStore::seeded();
        let result = execute(&mut store, "INSERT INTO products VALUES ('x', 'y', 1.0)").into_run_result();
        assert_eq!(result, RunResult::none());
        assert_eq!(store.counts().products, 4);
    }

    #[test]
    fn test_order_ignores_predicates() {
        let mut store = RelationStore::seeded();
        execute(&mut store, "INSERT INTO orders VALUES (1, 2, 1, 49.99)");
        execute(&mut store, "INSERT INTO orders VALUES (3, 4, 2, 179.98)");

        let rows = execute(&mut store, "SELECT * FROM orders WHERE id = 1").into_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].as_order().map(|o| o.product_name.as_str()), Some("Keyboard"));
    }
}
