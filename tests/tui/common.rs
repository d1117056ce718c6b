//! Common test utilities for binary-level tests.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// A temporary working area with a small directory tree and no config file.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("data.csv"), "id,name\n1,a\n").unwrap();
        std::fs::write(dir.path().join(".hidden"), "").unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Runs scratchsql with the sandbox as explorer root and a missing config.
    pub fn run(&self, args: &[&str]) -> (i32, String, String) {
        let config = self.path().join("absent.toml");
        let mut full: Vec<&str> = vec![
            "--dir",
            self.path().to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ];
        full.extend_from_slice(args);
        run_binary(&full)
    }
}

/// Runs the scratchsql binary built by `cargo test`.
pub fn run_binary(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_scratchsql"))
        .args(args)
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}
