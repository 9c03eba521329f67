//! Tracing instrumentation for the query simulator.
//!
//! Span attributes follow the OpenTelemetry database conventions:
//! - `db.operation.name`: `select`, `insert` or `unknown`
//! - `db.collection.name`: target relation, when recognised
//! - `db.query.text`: raw statement as received (injection payload included)
//!
//! # Example
//!
//! ```rust,ignore
//! let span = query_span(StatementKind::Select, Some("users"), sql);
//! let _guard = span.enter();
//!
//! let rows = select_users(store, sql);
//! record_query_metrics(Some(rows.len()), None);
//! ```

use crate::config::{Config, LogFormat};
use crate::query::StatementKind;
use tracing::{field, span, Level, Span};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Create the span wrapping one dispatched statement.
pub fn query_span(kind: StatementKind, collection: Option<&str>, query_text: &str) -> Span {
    let span = span!(
        Level::INFO,
        "db.query",
        otel.name = %format!("{} {}", kind.as_str(), collection.unwrap_or("?")),
        db.system.name = "memory",
        db.operation.name = kind.as_str(),
        db.collection.name = field::Empty,
        db.query.text = query_text,
        db.response.returned_rows = field::Empty,
        db.response.affected_rows = field::Empty,
    );

    if let Some(coll) = collection {
        span.record("db.collection.name", coll);
    }

    span
}

/// Record row counts on the current span.
pub fn record_query_metrics(rows_returned: Option<usize>, rows_affected: Option<usize>) {
    let span = Span::current();
    if let Some(returned) = rows_returned {
        span.record("db.response.returned_rows", returned);
    }
    if let Some(affected) = rows_affected {
        span.record("db.response.affected_rows", affected);
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter. Output goes to
/// stderr so that query results on stdout stay machine-readable.
pub fn init_tracing(config: &Config) {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("sqli_sim=info"));

    let registry = tracing_subscriber::registry().with(filter_layer);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init(),
    }
}
