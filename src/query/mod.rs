//! Query simulation: injection heuristic, pattern extractors and dispatch.
//!
//! Flow for a raw statement:
//! 1. `dispatch::classify` picks the statement kind and target relation
//! 2. SELECT: `heuristic` may short-circuit to the whole relation,
//!    otherwise `extract` builds a `Predicate` that filters the rows
//! 3. INSERT: `extract` pulls the positional `VALUES (...)` literals
//! 4. orders are denormalized by `memory::join_orders` on read

pub mod dispatch;
pub mod extract;
pub mod heuristic;
pub mod predicates;

pub use dispatch::{classify, execute, Classified, Outcome, Relation, StatementKind};
pub use heuristic::{detect_injection, detect_tautology, is_injection, InjectionTrigger};
pub use predicates::Predicate;
