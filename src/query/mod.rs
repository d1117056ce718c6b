//! Query execution for scratchsql.
//!
//! This module isolates the editor's SQL text and its execution outcome from
//! the terminal UI.

pub mod runner;

pub use runner::{PendingExecution, QueryRunner, RunStatus, EXECUTION_FAILED};
