//! Mock engines for testing.

use super::{ColumnInfo, QueryResult, SqlEngine, Value};
use crate::error::{ScratchError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A mock engine that echoes `SELECT` statements and returns an empty table
/// for everything else.
#[derive(Debug, Default)]
pub struct MockEngine {
    calls: AtomicUsize,
}

impl MockEngine {
    /// Creates a new mock engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batches executed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SqlEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn execute_batch(&self, sql: &str) -> Result<QueryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if sql.trim().to_uppercase().starts_with("SELECT") {
            let columns = vec![ColumnInfo::new("result", "TEXT")];
            let rows = vec![vec![Value::String(format!("Mock result for: {}", sql))]];
            Ok(QueryResult::with_data(columns, rows).with_execution_time(Duration::from_millis(1)))
        } else {
            Ok(QueryResult::new().with_execution_time(Duration::from_millis(1)))
        }
    }
}

/// An engine that fails every batch with a fixed message.
#[derive(Debug)]
pub struct FailingEngine {
    message: String,
}

impl FailingEngine {
    /// Creates an engine whose every execution fails with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl SqlEngine for FailingEngine {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn execute_batch(&self, _sql: &str) -> Result<QueryResult> {
        Err(ScratchError::query(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_select() {
        let engine = MockEngine::new();
        let result = engine.execute_batch("SELECT 1").await.unwrap();
        assert_eq!(result.row_count(), 1);
        assert_eq!(result.column_count(), 1);
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_non_select_is_empty() {
        let engine = MockEngine::new();
        let result = engine
            .execute_batch("CREATE TABLE t (id INTEGER)")
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_failing_engine() {
        let engine = FailingEngine::new("boom");
        let err = engine.execute_batch("SELECT 1").await.unwrap_err();
        assert_eq!(err, ScratchError::query("boom"));
    }
}
