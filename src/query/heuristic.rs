//! Injection heuristic.
//!
//! Coarse substring test run before predicate extraction. When it fires, the
//! handler returns the whole relation. No word boundaries: `ORDER BY`,
//! `ORACLE` and `password` trip it just as `' OR '1'='1` does.

/// Which injection shape was recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionTrigger {
    /// `'1'='1`
    QuotedTautology,
    /// `1=1`
    Tautology,
    /// `OR` anywhere
    Or,
    /// `UNION` anywhere
    Union,
}

impl InjectionTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuotedTautology => "'1'='1",
            Self::Tautology => "1=1",
            Self::Or => "OR",
            Self::Union => "UNION",
        }
    }
}

/// Upper-case and fold double quotes into single quotes.
fn normalize(sql: &str) -> String {
    sql.to_uppercase().replace('"', "'")
}

fn tautology(normalized: &str) -> Option<InjectionTrigger> {
    if normalized.contains("'1'='1") {
        Some(InjectionTrigger::QuotedTautology)
    } else if normalized.contains("1=1") {
        Some(InjectionTrigger::Tautology)
    } else {
        None
    }
}

/// Return the first trigger found in `sql`, if any.
///
/// Case-insensitive substrings; double quotes count as single quotes.
pub fn detect_injection(sql: &str) -> Option<InjectionTrigger> {
    let normalized = normalize(sql);

    tautology(&normalized).or_else(|| {
        if normalized.contains("OR") {
            Some(InjectionTrigger::Or)
        } else if normalized.contains("UNION") {
            Some(InjectionTrigger::Union)
        } else {
            None
        }
    })
}

/// Tautology triggers only.
///
/// Used for products, where `category` and `description` contain `or` and a
/// substring `OR` test would make the category filter unreachable.
pub fn detect_tautology(sql: &str) -> Option<InjectionTrigger> {
    tautology(&normalize(sql))
}

pub fn is_injection(sql: &str) -> bool {
    detect_injection(sql).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tautologies() {
        assert_eq!(
            detect_injection("SELECT * FROM users WHERE username = 'a' OR '1'='1'"),
            Some(InjectionTrigger::QuotedTautology)
        );
        assert_eq!(
            detect_injection("SELECT * FROM users WHERE id=1 OR 1=1"),
            Some(InjectionTrigger::Tautology)
        );
        assert_eq!(
            detect_injection(r#"SELECT * FROM users WHERE name = "x" or "1"="1""#),
            Some(InjectionTrigger::QuotedTautology)
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            detect_injection("select * from users where id = 2 or id = 3"),
            Some(InjectionTrigger::Or)
        );
        assert_eq!(
            detect_injection("SELECT * FROM users WHERE id = 1 union select * from products"),
            Some(InjectionTrigger::Union)
        );
    }

    #[test]
    fn test_keywords_match_inside_words() {
        assert_eq!(
            detect_injection("SELECT * FROM users WHERE id = 2 ORDER BY username"),
            Some(InjectionTrigger::Or)
        );
        assert_eq!(
            detect_injection("SELECT * FROM users WHERE username LIKE '%ORACLE%'"),
            Some(InjectionTrigger::Or)
        );
        assert_eq!(
            detect_injection("SELECT * FROM users WHERE id=2 OR1"),
            Some(InjectionTrigger::Or)
        );
        assert_eq!(
            detect_injection("SELECT * FROM users WHERE x = 1UNION SELECT 1"),
            Some(InjectionTrigger::Union)
        );
        assert!(is_injection("SELECT * FROM users WHERE username LIKE '%ordinary%'"));
        assert!(is_injection(
            "SELECT id FROM users WHERE username = 'admin' AND password = 'admin123'"
        ));
    }

    #[test]
    fn test_clean_queries() {
        assert!(!is_injection("SELECT * FROM users WHERE role = 'admin'"));
        assert!(!is_injection("SELECT * FROM users WHERE id = 3"));
        assert!(!is_injection("SELECT * FROM users WHERE 1 = 1"));
    }

    #[test]
    fn test_tautology_only_for_products() {
        let sql = "SELECT * FROM products WHERE category = 'accessories' ORDER BY price";
        assert!(is_injection(sql));
        assert_eq!(detect_tautology(sql), None);
        assert_eq!(
            detect_tautology("SELECT * FROM products WHERE 1=1 AND category = 'books'"),
            Some(InjectionTrigger::Tautology)
        );
    }
}
