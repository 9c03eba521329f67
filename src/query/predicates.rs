//! Predicates produced by the pattern extractors.
//!
//! Evaluated against typed rows through the [`Record`] field lookup.

use crate::types::row::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Filter applied to the rows of one relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// id == n
    IdEq(i64),
    /// field == value
    Eq(String, Value),
    /// field >= value
    Gte(String, Value),
    /// field <= value
    Lte(String, Value),
    /// any of fields CONTAINS substring (case-sensitive)
    Contains(Vec<String>, String),
    /// pred1 AND pred2 AND ...
    And(Vec<Predicate>),
    All,
    None,
}

impl Predicate {
    /// Combine with another predicate using AND.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::All, p) | (p, Predicate::All) => p,
            (Predicate::And(mut preds), p) => {
                preds.push(p);
                Predicate::And(preds)
            }
            (a, b) => Predicate::And(vec![a, b]),
        }
    }

    /// Evaluate predicate against a row.
    ///
    /// Missing fields never match.
    pub fn evaluate<R: Record>(&self, row: &R) -> bool {
        match self {
            Predicate::IdEq(id) => row.id() == *id,
            Predicate::Eq(field, value) => row.field(field).map(|v| v == *value).unwrap_or(false),
            Predicate::Gte(field, value) => row
                .field(field)
                .and_then(|v| compare_values(&v, value))
                .map(|ord| ord != Ordering::Less)
                .unwrap_or(false),
            Predicate::Lte(field, value) => row
                .field(field)
                .and_then(|v| compare_values(&v, value))
                .map(|ord| ord != Ordering::Greater)
                .unwrap_or(false),
            Predicate::Contains(fields, substring) => fields.iter().any(|field| {
                row.field(field)
                    .as_ref()
                    .and_then(|v| v.as_str())
                    .map(|s| s.contains(substring.as_str()))
                    .unwrap_or(false)
            }),
            Predicate::And(predicates) => predicates.iter().all(|p| p.evaluate(row)),
            Predicate::All => true,
            Predicate::None => false,
        }
    }

    /// Keep the rows that satisfy the predicate, preserving order.
    pub fn filter<R: Record + Clone>(&self, rows: &[R]) -> Vec<R> {
        rows.iter().filter(|r| self.evaluate(*r)).cloned().collect()
    }
}

/// Compare two JSON values; `None` when they are not comparable.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::RelationStore;
    use serde_json::json;

    #[test]
    fn test_eq_predicate() {
        let store = RelationStore::seeded();
        let pred = Predicate::Eq("role".to_string(), json!("admin"));
        let admins = pred.filter(store.users());
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].username, "admin");

        let pred = Predicate::Eq("role".to_string(), json!("Admin"));
        assert!(pred.filter(store.users()).is_empty());
    }

    #[test]
    fn test_contains_any_field() {
        let store = RelationStore::seeded();
        let pred = Predicate::Contains(
            vec!["username".to_string(), "email".to_string()],
            "jane".to_string(),
        );
        let found = pred.filter(store.users());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 3);

        // Case-sensitive
        let pred = Predicate::Contains(vec!["username".to_string()], "JANE".to_string());
        assert!(pred.filter(store.users()).is_empty());
    }

    #[test]
    fn test_range_and_predicate() {
        let store = RelationStore::seeded();
        let pred = Predicate::Gte("price".to_string(), json!(29.99))
            .and(Predicate::Lte("price".to_string(), json!(89.99)));
        assert!(matches!(pred, Predicate::And(_)));

        let names: Vec<String> = pred
            .filter(store.products())
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Security Book", "Wireless Mouse", "Keyboard"]);
    }

    #[test]
    fn test_and_with_all_is_identity() {
        let pred = Predicate::All.and(Predicate::IdEq(2));
        assert_eq!(pred, Predicate::IdEq(2));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let store = RelationStore::seeded();
        let pred = Predicate::Gte("price".to_string(), json!(0));
        assert!(pred.filter(store.users()).is_empty());
        assert!(Predicate::None.filter(store.users()).is_empty());
    }
}
