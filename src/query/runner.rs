//! Query runner state machine.
//!
//! Holds the editor text, the last materialized result, the last error and a
//! busy flag. An execution is split in three steps so the UI can run the engine
//! on a background task:
//!
//! 1. [`QueryRunner::begin`] marks the runner busy and hands out a
//!    [`PendingExecution`] holding a snapshot of the SQL.
//! 2. [`PendingExecution::run`] executes the snapshot on an engine.
//! 3. [`QueryRunner::finish`] applies the outcome.
//!
//! While busy, further `begin` calls are rejected.

use crate::db::{QueryResult, SqlEngine};
use crate::error::{ScratchError, Result};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Prefix of every message stored after a failed execution.
pub const EXECUTION_FAILED: &str = "Execution failed";

/// A started execution waiting for its engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingExecution {
    ticket: u64,
    sql: String,
}

impl PendingExecution {
    /// Identifier matching this execution to its runner.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// The SQL captured when the execution began.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Runs the captured SQL on `engine`.
    pub async fn run(&self, engine: &dyn SqlEngine) -> Result<QueryResult> {
        let start = Instant::now();
        let outcome = engine.execute_batch(&self.sql).await;
        debug!(
            "Execution #{} on {} took {:?}",
            self.ticket,
            engine.name(),
            start.elapsed()
        );
        outcome
    }
}

/// How a call to [`QueryRunner::execute`] or [`QueryRunner::finish`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// A result table replaced the previous one.
    Succeeded { rows: usize, columns: usize },
    /// The error message was set and the result cleared.
    Failed,
    /// Nothing changed: another execution was in flight, or the outcome
    /// belonged to an execution that is no longer current.
    Rejected,
}

/// Owns the SQL text and the observable outcome of the last execution.
#[derive(Debug, Default)]
pub struct QueryRunner {
    query: String,
    result: QueryResult,
    error: Option<String>,
    active: Option<u64>,
    next_ticket: u64,
}

impl QueryRunner {
    /// Creates a runner with the given initial SQL text.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Current SQL text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replaces the SQL text.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Last result table (empty until a successful execution).
    pub fn result(&self) -> &QueryResult {
        &self.result
    }

    /// Last error message, if the last execution failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True between `begin` and the matching `finish`.
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Starts an execution of the current SQL text.
    ///
    /// Fails with [`ScratchError::Busy`] if an execution is already in flight.
    pub fn begin(&mut self) -> Result<PendingExecution> {
        if let Some(ticket) = self.active {
            warn!("Rejected execution while #{} is running", ticket);
            return Err(ScratchError::Busy);
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.active = Some(ticket);

        Ok(PendingExecution {
            ticket,
            sql: self.query.clone(),
        })
    }

    /// Applies the outcome of `pending`.
    ///
    /// Success replaces the result and clears the error. Failure clears the
    /// result and stores `Execution failed: <engine message>`. Either way the
    /// runner is no longer busy.
    pub fn finish(&mut self, pending: &PendingExecution, outcome: Result<QueryResult>) -> RunStatus {
        if self.active != Some(pending.ticket) {
            warn!("Discarding outcome of stale execution #{}", pending.ticket);
            return RunStatus::Rejected;
        }
        self.active = None;

        match outcome {
            Ok(result) => {
                let status = RunStatus::Succeeded {
                    rows: result.row_count(),
                    columns: result.column_count(),
                };
                info!(
                    "Query returned {} row(s) in {}ms",
                    result.row_count(),
                    result.execution_time.as_millis()
                );
                self.result = result;
                self.error = None;
                status
            }
            Err(e) => {
                info!("Query failed: {}", e);
                self.result = QueryResult::new();
                self.error = Some(format!("{EXECUTION_FAILED}: {}", e.detail()));
                RunStatus::Failed
            }
        }
    }

    /// Runs the current SQL on `engine` and applies the outcome.
    pub async fn execute(&mut self, engine: &dyn SqlEngine) -> RunStatus {
        let pending = match self.begin() {
            Ok(pending) => pending,
            Err(_) => return RunStatus::Rejected,
        };
        let outcome = pending.run(engine).await;
        self.finish(&pending, outcome)
    }
}
