//! Embedded SQL engine layer.
//!
//! Provides a trait-based interface over the engine so the query runner can be
//! exercised against mock engines in tests.

mod mock;
mod sqlite;
mod types;

pub use mock::{FailingEngine, MockEngine};
pub use sqlite::SqliteEngine;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::error::Result;
use async_trait::async_trait;

/// An engine that executes one SQL batch in isolation.
///
/// Implementations must not carry session state from one call to the next:
/// every call starts from an empty catalog.
#[async_trait]
pub trait SqlEngine: Send + Sync {
    /// Short engine name for display.
    fn name(&self) -> &'static str;

    /// Runs `sql` as a single batch and materializes the result of its last
    /// statement.
    async fn execute_batch(&self, sql: &str) -> Result<QueryResult>;
}
