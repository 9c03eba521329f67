//! Pattern extractors.
//!
//! Regex-as-grammar: each extractor looks for one literal fragment anywhere in
//! the raw statement. There is deliberately no real SQL parsing here, so
//! `user_id = 3` satisfies the identifier pattern and stray clauses are ignored.

use super::predicates::Predicate;
use regex::{Captures, Regex};
use serde_json::json;
use std::sync::LazyLock;
use tracing::debug;

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("static pattern")
}

static ID_EQ: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)id\s*=\s*(\d+)"));
static LIKE_TERM: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)LIKE\s*'%([^%]+)%'"));
static ROLE_EQ: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)role\s*=\s*'([^']+)'"));
static CATEGORY_EQ: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)category\s*=\s*'([^']+)'"));
static PRICE_GTE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)price\s*>=\s*(\d+(?:\.\d+)?)"));
static PRICE_LTE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)price\s*<=\s*(\d+(?:\.\d+)?)"));

static USER_VALUES: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)VALUES\s*\(\s*'([^']+)'\s*,\s*'([^']+)'\s*,\s*'([^']+)'\s*,\s*'([^']+)'\s*\)")
});
static PRODUCT_VALUES: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)VALUES\s*\(\s*'([^']+)'\s*,\s*'([^']+)'\s*,\s*(-?\d+(?:\.\d+)?)\s*,\s*'([^']+)'\s*,\s*(-?\d+)\s*\)",
    )
});
static ORDER_VALUES: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)VALUES\s*\(\s*(-?\d+)\s*,\s*(-?\d+)\s*,\s*(-?\d+)\s*,\s*(-?\d+(?:\.\d+)?)\s*\)")
});

/// Identifier lookup. An identifier too large to represent matches nothing.
fn id_predicate(sql: &str) -> Option<Predicate> {
    let caps = ID_EQ.captures(sql)?;
    let pred = caps[1]
        .parse::<i64>()
        .map(Predicate::IdEq)
        .unwrap_or(Predicate::None);
    debug!(extractor = "id", predicate = ?pred, "Extractor matched");
    Some(pred)
}

/// Predicate for a users SELECT. First matching pattern wins:
/// id, then `LIKE '%term%'` on username/email, then role.
pub fn user_predicate(sql: &str) -> Option<Predicate> {
    if let Some(pred) = id_predicate(sql) {
        return Some(pred);
    }

    if let Some(caps) = LIKE_TERM.captures(sql) {
        debug!(extractor = "like", term = &caps[1], "Extractor matched");
        return Some(Predicate::Contains(
            vec!["username".to_string(), "email".to_string()],
            caps[1].to_string(),
        ));
    }

    if let Some(caps) = ROLE_EQ.captures(sql) {
        debug!(extractor = "role", role = &caps[1], "Extractor matched");
        return Some(Predicate::Eq("role".to_string(), json!(&caps[1])));
    }

    None
}

/// Predicate for a products SELECT.
///
/// Identifier lookup wins outright. Otherwise category and both price bounds
/// each narrow the result independently.
pub fn product_predicate(sql: &str) -> Option<Predicate> {
    if let Some(pred) = id_predicate(sql) {
        return Some(pred);
    }

    let mut pred = Predicate::All;
    let mut matched = false;

    if let Some(caps) = CATEGORY_EQ.captures(sql) {
        debug!(extractor = "category", category = &caps[1], "Extractor matched");
        pred = pred.and(Predicate::Eq("category".to_string(), json!(&caps[1])));
        matched = true;
    }

    if let Some(min) = price_bound(&PRICE_GTE, sql) {
        debug!(extractor = "min_price", min, "Extractor matched");
        pred = pred.and(Predicate::Gte("price".to_string(), json!(min)));
        matched = true;
    }

    if let Some(max) = price_bound(&PRICE_LTE, sql) {
        debug!(extractor = "max_price", max, "Extractor matched");
        pred = pred.and(Predicate::Lte("price".to_string(), json!(max)));
        matched = true;
    }

    matched.then_some(pred)
}

fn price_bound(re: &Regex, sql: &str) -> Option<f64> {
    re.captures(sql)?[1].parse().ok()
}

/// Literal list of `INSERT INTO users ... VALUES ('u', 'e', 'p', 'r')`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserValues {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Literal list of `INSERT INTO products ... VALUES ('n', 'd', price, 'c', stock)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductValues {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: i64,
}

/// Literal list of `INSERT INTO orders ... VALUES (user, product, quantity, total)`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderValues {
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub total_price: f64,
}

/// Extract the user literal list, or `None` if the shape is wrong.
pub fn user_values(sql: &str) -> Option<UserValues> {
    let caps = USER_VALUES.captures(sql)?;
    Some(UserValues {
        username: caps[1].to_string(),
        email: caps[2].to_string(),
        password: caps[3].to_string(),
        role: caps[4].to_string(),
    })
}

/// Extract the product literal list, or `None` if the shape is wrong.
pub fn product_values(sql: &str) -> Option<ProductValues> {
    let caps = PRODUCT_VALUES.captures(sql)?;
    Some(ProductValues {
        name: caps[1].to_string(),
        description: caps[2].to_string(),
        price: number(&caps, 3)?,
        category: caps[4].to_string(),
        stock: number(&caps, 5)?,
    })
}

/// Extract the order literal list, or `None` if the shape is wrong.
pub fn order_values(sql: &str) -> Option<OrderValues> {
    let caps = ORDER_VALUES.captures(sql)?;
    Some(OrderValues {
        user_id: number(&caps, 1)?,
        product_id: number(&caps, 2)?,
        quantity: number(&caps, 3)?,
        total_price: number(&caps, 4)?,
    })
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, group: usize) -> Option<T> {
    caps.get(group)?.as_str().parse().ok()
}
