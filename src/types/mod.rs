//! Core types for the query simulator.

pub mod error;
pub mod row;

pub use error::{Result, SimError};
pub use row::{Order, OrderView, Product, Row, RunResult, User};
