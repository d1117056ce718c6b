//! Ephemeral in-memory SQLite engine.
//!
//! Every batch gets its own freshly opened in-memory database which is closed
//! as soon as the result is materialized, so tables, pragmas and open
//! transactions never survive from one run to the next.

use crate::db::{ColumnInfo, QueryResult, Row, SqlEngine, Value};
use crate::error::{ScratchError, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, Connection, Either, Executor, Row as SqlxRow, TypeInfo, ValueRef};
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, warn};

/// Connection URL for a private in-memory database.
const MEMORY_URL: &str = "sqlite::memory:";

/// SQLite engine that opens a fresh in-memory database per batch.
#[derive(Debug, Clone, Default)]
pub struct SqliteEngine;

impl SqliteEngine {
    /// Creates a new engine.
    pub fn new() -> Self {
        Self
    }

    async fn open(&self) -> Result<SqliteConnection> {
        let options = SqliteConnectOptions::from_str(MEMORY_URL)
            .map_err(|e| ScratchError::internal(format!("Invalid engine options: {e}")))?;

        SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| ScratchError::query(format!("Failed to open in-memory database: {e}")))
    }

    async fn run(&self, conn: &mut SqliteConnection, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();

        let mut statements = 0usize;
        let mut current: Vec<SqliteRow> = Vec::new();
        let mut last: Vec<SqliteRow> = Vec::new();

        {
            let mut stream = sqlx::raw_sql(sql).fetch_many(&mut *conn);
            while let Some(item) = stream
                .try_next()
                .await
                .map_err(|e| ScratchError::query(format_query_error(e)))?
            {
                match item {
                    // A statement finished; its rows (possibly none) become the latest result
                    Either::Left(_) => {
                        statements += 1;
                        last = std::mem::take(&mut current);
                    }
                    Either::Right(row) => current.push(row),
                }
            }
        }

        if !current.is_empty() {
            statements += 1;
            last = current;
        }

        if statements == 0 {
            return Err(ScratchError::query("No statements to execute"));
        }

        let execution_time = start.elapsed();
        debug!("Batch of {} statement(s) finished in {:?}", statements, execution_time);

        // An empty result keeps the columns its statement would have produced.
        // The batch has already run, so tables it created are visible here.
        let columns = match (last.first(), last_statement(sql)) {
            (Some(first), _) => column_info(first),
            (None, Some(statement)) => describe_columns(conn, statement).await,
            (None, None) => Vec::new(),
        };

        let rows: Vec<Row> = last.iter().map(convert_row).collect();

        Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
    }
}

#[async_trait]
impl SqlEngine for SqliteEngine {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn execute_batch(&self, sql: &str) -> Result<QueryResult> {
        if sql.trim().is_empty() {
            return Err(ScratchError::query("No statements to execute"));
        }

        let mut conn = self.open().await?;
        let result = self.run(&mut conn, sql).await;

        if let Err(e) = conn.close().await {
            warn!("Failed to close in-memory database: {}", e);
        }

        result
    }
}

fn column_info(row: &SqliteRow) -> Vec<ColumnInfo> {
    row.columns()
        .iter()
        .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
        .collect()
}

async fn describe_columns(conn: &mut SqliteConnection, sql: &str) -> Vec<ColumnInfo> {
    match conn.describe(sql).await {
        Ok(described) => described
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect(),
        Err(e) => {
            debug!("Could not describe empty result: {}", e);
            Vec::new()
        }
    }
}

/// Returns the last statement of `sql` that contains more than whitespace and
/// comments.
///
/// Splits on `;` outside string literals, quoted identifiers and comments.
/// Trigger bodies are split too, which leaves `END` as the last statement; it
/// fails to describe and the empty result has no columns.
fn last_statement(sql: &str) -> Option<&str> {
    let bytes = sql.as_bytes();
    let mut last = None;
    let mut start = 0;
    let mut has_code = false;
    let mut i = 0;

    while i < bytes.len() {
        let next = bytes.get(i + 1).copied();
        match bytes[i] {
            b'-' if next == Some(b'-') => {
                i = find_from(bytes, i + 2, b"\n").map_or(bytes.len(), |end| end + 1);
                continue;
            }
            b'/' if next == Some(b'*') => {
                i = find_from(bytes, i + 2, b"*/").map_or(bytes.len(), |end| end + 2);
                continue;
            }
            quote @ (b'\'' | b'"' | b'`' | b'[') => {
                let close = if quote == b'[' { b']' } else { quote };
                i = skip_quoted(bytes, i + 1, close);
                has_code = true;
                continue;
            }
            b';' => {
                if has_code {
                    last = Some(sql[start..i].trim());
                }
                start = i + 1;
                has_code = false;
            }
            b if b.is_ascii_whitespace() => {}
            _ => has_code = true,
        }
        i += 1;
    }

    if has_code {
        last = Some(sql[start..].trim());
    }
    last
}

fn find_from(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

/// Index just past the closing `close`. A doubled quote is an escaped quote.
fn skip_quoted(bytes: &[u8], mut i: usize, close: u8) -> usize {
    while i < bytes.len() {
        if bytes[i] == close {
            if close != b']' && bytes.get(i + 1) == Some(&close) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    (0..row.columns().len())
        .map(|i| convert_value(row, i))
        .collect()
}

/// Converts a single value using its runtime storage class.
///
/// SQLite is dynamically typed, so the declared column type says little about
/// what a given cell holds. The storage class is one of NULL, INTEGER, REAL,
/// TEXT or BLOB; booleans are stored as INTEGER.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let type_name = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    match type_name.as_str() {
        "INTEGER" => row
            .try_get_unchecked::<i64, _>(index)
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" => row
            .try_get_unchecked::<f64, _>(index)
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get_unchecked::<Vec<u8>, _>(index)
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        _ => row
            .try_get_unchecked::<String, _>(index)
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

/// Extracts the engine's own message from a sqlx error.
fn format_query_error(error: sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => db_error.message().to_string(),
        None => error.to_string(),
    }
}
