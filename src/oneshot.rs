//! One-shot execution for `--execute`.
//!
//! Runs a single batch through a [`QueryRunner`] and prints the outcome as a
//! text table or JSON.

use crate::cli::OutputFormat;
use crate::db::SqlEngine;
use crate::error::Result;
use crate::query::QueryRunner;
use crate::tui::widgets::table::ResultTable;
use serde_json::json;
use tracing::info;

/// Width given to the text table, so columns are never scaled down.
const PLAIN_TABLE_WIDTH: usize = usize::MAX;

/// What to print and how to exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub stdout: String,
    pub stderr: Option<String>,
    pub exit_code: i32,
}

/// Formats the state of `runner` after an execution.
pub fn format_outcome(runner: &QueryRunner, format: OutputFormat) -> Outcome {
    match (runner.error(), format) {
        (Some(error), OutputFormat::Json) => Outcome {
            stdout: json!({ "error": error }).to_string(),
            stderr: None,
            exit_code: 1,
        },
        (Some(error), _) => Outcome {
            stdout: String::new(),
            stderr: Some(error.to_string()),
            exit_code: 1,
        },
        (None, OutputFormat::Json) => {
            let result = runner.result();
            let columns: Vec<_> = result
                .columns
                .iter()
                .map(|c| json!({ "name": c.name, "type": c.data_type }))
                .collect();
            Outcome {
                stdout: json!({
                    "columns": columns,
                    "rows": result.to_json_rows(),
                    "row_count": result.row_count(),
                    "execution_time_ms": result.execution_time.as_millis() as u64,
                })
                .to_string(),
                stderr: None,
                exit_code: 0,
            }
        }
        (None, _) => Outcome {
            stdout: ResultTable::new(runner.result()).render_plain(PLAIN_TABLE_WIDTH),
            stderr: None,
            exit_code: 0,
        },
    }
}

/// Executes `sql` once and prints the outcome. Returns the process exit code.
pub async fn run_execute(sql: &str, format: OutputFormat, engine: &dyn SqlEngine) -> Result<i32> {
    let mut runner = QueryRunner::new(sql);
    let status = runner.execute(engine).await;
    info!("One-shot execution finished: {:?}", status);

    let outcome = format_outcome(&runner, format);
    if !outcome.stdout.is_empty() {
        println!("{}", outcome.stdout);
    }
    if let Some(stderr) = &outcome.stderr {
        eprintln!("{stderr}");
    }
    Ok(outcome.exit_code)
}
