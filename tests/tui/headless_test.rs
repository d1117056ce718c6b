//! Headless mode tests.

use super::common::Sandbox;

#[test]
fn test_headless_basic_execution() {
    let sandbox = Sandbox::new();
    let (code, stdout, stderr) = sandbox.run(&["--headless", "--events", "key:f5"]);

    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("Events: 1 executed"), "stdout: {stdout}");
    assert!(stdout.contains("Welcome!"));
}

#[test]
fn test_headless_run_shows_result_row() {
    let sandbox = Sandbox::new();
    let (code, stdout, _) = sandbox.run(&[
        "--headless",
        "--events",
        "key:f5,assert:contains:1 row returned,assert:state:row_count=1",
    ]);

    assert_eq!(code, 0, "stdout: {stdout}");
    assert!(stdout.contains("Assertions: 2 passed, 0 failed"));
}

#[test]
fn test_headless_explorer_lists_sandbox() {
    let sandbox = Sandbox::new();
    let (code, stdout, _) = sandbox.run(&[
        "--headless",
        "--events",
        "assert:contains:docs/,assert:contains:data.csv,assert:not-contains:.hidden",
    ]);

    assert_eq!(code, 0, "stdout: {stdout}");
}

#[test]
fn test_headless_typed_query_with_commas() {
    let sandbox = Sandbox::new();
    let (code, stdout, _) = sandbox.run(&[
        "--headless",
        "--query",
        "",
        "--events",
        "type:SELECT 1 AS a, 2 AS b,key:f5,assert:state:column_count=2",
        "--output",
        "json",
    ]);

    assert_eq!(code, 0, "stdout: {stdout}");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["state"]["query_text"], "SELECT 1 AS a, 2 AS b");
    assert_eq!(parsed["state"]["row_count"], 1);
    assert_eq!(parsed["assertions"]["passed"], 1);
}

#[test]
fn test_headless_error_is_displayed() {
    let sandbox = Sandbox::new();
    let (code, stdout, _) = sandbox.run(&[
        "--headless",
        "--query",
        "SELEC 1;",
        "--events",
        "key:f5,assert:contains:Execution failed,assert:state:row_count=0",
    ]);

    assert_eq!(code, 0, "stdout: {stdout}");
}

#[test]
fn test_headless_failed_assertion_exit_code() {
    let sandbox = Sandbox::new();
    let (code, stdout, _) = sandbox.run(&[
        "--headless",
        "--events",
        "assert:contains:definitely not on screen",
    ]);

    assert_eq!(code, 1);
    assert!(stdout.contains("FAILED"));
}

#[test]
fn test_headless_explorer_navigation() {
    let sandbox = Sandbox::new();
    let docs = sandbox.path().join("docs");
    let expected = format!("assert:state:current_path={}", docs.display());
    let events = format!("key:tab,key:down,key:enter,{expected}");
    let (code, stdout, _) = sandbox.run(&["--headless", "--events", &events]);

    assert_eq!(code, 0, "stdout: {stdout}");
}

#[test]
fn test_headless_frames_output() {
    let sandbox = Sandbox::new();
    let (code, stdout, _) = sandbox.run(&[
        "--headless",
        "--events",
        "key:f5",
        "--output",
        "frames",
    ]);

    assert_eq!(code, 0);
    assert!(stdout.contains("=== FRAME 0 (initial) ==="));
    assert!(stdout.contains("=== FRAME 1 (key:f5) ==="));
}

#[test]
fn test_headless_requires_events() {
    let sandbox = Sandbox::new();
    let (code, _, stderr) = sandbox.run(&["--headless"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("--events or --script"));
}

#[test]
fn test_headless_results_filter_and_sort() {
    let sandbox = Sandbox::new();
    let (code, stdout, _) = sandbox.run(&[
        "--headless",
        "--query",
        "SELECT 'pear' AS fruit UNION ALL SELECT 'apple' UNION ALL SELECT 'plum'",
        "--events",
        "key:f5,key:shift+tab,type:s,key:/,type:p,key:enter,assert:state:visible_rows=3,assert:state:sort=fruit asc",
        "--output",
        "json",
    ]);

    assert_eq!(code, 0, "stdout: {stdout}");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["state"]["filter"], "p");
    assert_eq!(parsed["state"]["row_count"], 3);
}
