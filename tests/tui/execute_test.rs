//! One-shot `--execute` tests.

use super::common::Sandbox;

#[test]
fn test_execute_text_output() {
    let sandbox = Sandbox::new();
    let (code, stdout, stderr) = sandbox.run(&["-e", "SELECT 1 AS x"]);

    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("x"));
    assert!(stdout.contains("1 row returned"));
}

#[test]
fn test_execute_json_output() {
    let sandbox = Sandbox::new();
    let (code, stdout, _) = sandbox.run(&[
        "-e",
        "SELECT 1 AS x UNION ALL SELECT 2",
        "--output",
        "json",
    ]);

    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed["row_count"], 2);
    assert_eq!(parsed["columns"][0]["name"], "x");
    assert_eq!(parsed["rows"][1], serde_json::json!([2]));
}

#[test]
fn test_execute_json_keeps_repeated_columns() {
    let sandbox = Sandbox::new();
    let (code, stdout, _) = sandbox.run(&["-e", "SELECT 2 AS b, 1 AS a, 3 AS a", "--output", "json"]);

    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed["columns"].as_array().map(Vec::len), Some(3));
    assert_eq!(parsed["rows"][0], serde_json::json!([2, 1, 3]));
}

#[test]
fn test_execute_error_exit_code() {
    let sandbox = Sandbox::new();
    let (code, stdout, stderr) = sandbox.run(&["-e", "SELEC 1"]);

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Execution failed"));
}

#[test]
fn test_execute_rejects_frames() {
    let sandbox = Sandbox::new();
    let (code, _, stderr) = sandbox.run(&["-e", "SELECT 1", "--output", "frames"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("--output text or json"));
}
