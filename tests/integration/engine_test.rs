//! Query runner tests against the embedded SQLite engine.

use pretty_assertions::assert_eq;
use scratchsql::db::{SqliteEngine, Value};
use scratchsql::query::{QueryRunner, RunStatus};

async fn run(sql: &str) -> QueryRunner {
    let mut runner = QueryRunner::new(sql);
    runner.execute(&SqliteEngine::new()).await;
    runner
}

#[tokio::test]
async fn test_result_shape_matches_query() {
    let runner = run("SELECT 1 AS a, 2 AS b, 3 AS c UNION ALL SELECT 4, 5, 6;").await;

    assert_eq!(runner.error(), None);
    assert_eq!(runner.result().row_count(), 2);
    assert_eq!(runner.result().column_count(), 3);
    assert!(!runner.is_busy());
}

#[tokio::test]
async fn test_welcome_literal() {
    let runner = run("SELECT 'Welcome!' AS message;").await;
    let result = runner.result();

    assert_eq!(result.columns[0].name, "message");
    assert_eq!(result.rows, vec![vec![Value::String("Welcome!".to_string())]]);
}

#[tokio::test]
async fn test_repeated_execution_is_idempotent() {
    let mut runner = QueryRunner::new("SELECT x, x * x AS sq FROM (SELECT 1 AS x UNION ALL SELECT 2) ORDER BY x;");
    let engine = SqliteEngine::new();

    runner.execute(&engine).await;
    let first = runner.result().clone();
    runner.execute(&engine).await;

    assert!(first.same_data(runner.result()));
}

#[tokio::test]
async fn test_state_does_not_leak_between_runs() {
    let engine = SqliteEngine::new();
    let mut runner = QueryRunner::new("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (1); SELECT * FROM t;");
    assert!(matches!(runner.execute(&engine).await, RunStatus::Succeeded { rows: 1, .. }));

    runner.set_query("SELECT * FROM t;");
    assert_eq!(runner.execute(&engine).await, RunStatus::Failed);
    assert!(runner.error().unwrap().contains("no such table"));
}

#[tokio::test]
async fn test_failure_discards_previous_result() {
    let engine = SqliteEngine::new();
    let mut runner = QueryRunner::new("SELECT 1 AS x;");
    runner.execute(&engine).await;
    assert_eq!(runner.result().row_count(), 1);

    runner.set_query("SELEC 1;");
    assert_eq!(runner.execute(&engine).await, RunStatus::Failed);

    assert!(runner.result().is_empty());
    let error = runner.error().unwrap();
    assert!(error.starts_with("Execution failed: "), "{error}");
    assert!(error.contains("syntax error"), "{error}");
    assert!(!runner.is_busy());
}

#[tokio::test]
async fn test_success_clears_previous_error() {
    let engine = SqliteEngine::new();
    let mut runner = QueryRunner::new("SELECT * FROM missing;");
    runner.execute(&engine).await;
    assert!(runner.error().is_some());

    runner.set_query("SELECT 2 AS y;");
    runner.execute(&engine).await;

    assert_eq!(runner.error(), None);
    assert_eq!(runner.result().rows, vec![vec![Value::Int(2)]]);
}

#[tokio::test]
async fn test_empty_batch_is_an_error() {
    let runner = run("   ").await;

    assert!(runner.result().is_empty());
    assert!(runner.error().is_some());
}

#[tokio::test]
async fn test_multi_statement_keeps_last_result() {
    let runner = run("SELECT 1 AS first; SELECT 'two' AS second, 3 AS third;").await;
    let result = runner.result();

    assert_eq!(result.column_count(), 2);
    assert_eq!(result.columns[0].name, "second");
    assert_eq!(
        result.rows,
        vec![vec![Value::String("two".to_string()), Value::Int(3)]]
    );
}

#[tokio::test]
async fn test_null_and_float_values() {
    let runner = run("SELECT NULL AS n, 1.5 AS f;").await;
    let row = &runner.result().rows[0];

    assert!(row[0].is_null());
    assert_eq!(row[1], Value::Float(1.5));
}

#[tokio::test]
async fn test_empty_result_after_setup_keeps_columns() {
    let runner = run("CREATE TABLE t (a INTEGER, b TEXT); SELECT a, b FROM t;").await;
    let result = runner.result();

    assert_eq!(runner.error(), None);
    assert_eq!(result.row_count(), 0);
    let names: Vec<&str> = result.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[tokio::test]
async fn test_filtered_to_nothing_keeps_columns() {
    let runner = run(
        "CREATE TABLE t (id INTEGER, label TEXT); INSERT INTO t VALUES (1, 'x'); \
         SELECT label, id FROM t WHERE id > 5;",
    )
    .await;

    assert_eq!(runner.result().row_count(), 0);
    assert_eq!(runner.result().column_count(), 2);
    assert_eq!(runner.result().columns[0].name, "label");
}
