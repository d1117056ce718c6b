//! Command-line argument parsing for scratchsql.

use crate::config::Config;
use crate::error::{ScratchError, Result};
use clap::Parser;
use std::path::PathBuf;

/// Output format for headless and one-shot modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text.
    #[default]
    Text,
    /// JSON document.
    Json,
    /// Frame-by-frame screens (headless only).
    Frames,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "frames" => Ok(Self::Frames),
            _ => Err(format!(
                "Invalid output format: {s}. Expected: text, json, or frames"
            )),
        }
    }
}

/// A terminal SQL scratchpad with a file explorer.
#[derive(Parser, Debug)]
#[command(name = "scratchsql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory the file explorer starts in
    #[arg(short = 'd', long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// SQL text to load into the editor
    #[arg(short = 'q', long, value_name = "SQL")]
    pub query: Option<String>,

    /// Load the editor contents from a SQL file
    #[arg(short = 'f', long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Execute SQL once, print the result and exit
    #[arg(short = 'e', long, value_name = "SQL")]
    pub execute: Option<String>,

    // === Headless mode options ===
    /// Run in headless mode (no terminal UI, for testing/automation)
    #[arg(long)]
    pub headless: bool,

    /// Comma-separated events to execute in headless mode (e.g., "type:SELECT 1,key:f5")
    #[arg(long, value_name = "EVENTS")]
    pub events: Option<String>,

    /// Path to script file with events (use "-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub script: Option<String>,

    /// Screen size for headless mode (WIDTHxHEIGHT, e.g., "80x24")
    #[arg(long, value_name = "SIZE", default_value = "100x30")]
    pub size: String,

    /// Output format: text, json, or frames (headless only)
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Write headless output to file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Stop on first assertion failure
    #[arg(long)]
    pub fail_fast: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// True when the full-screen terminal UI will run.
    pub fn is_interactive(&self) -> bool {
        !self.headless && self.execute.is_none()
    }

    /// Explorer start directory: `--dir`, then config.
    pub fn start_dir(&self, config: &Config) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| config.explorer.start_dir.clone())
    }

    /// Initial editor text: `--file`, then `--query`, then config.
    pub fn initial_query(&self, config: &Config) -> Result<String> {
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path).map_err(|e| {
                ScratchError::config(format!("Failed to read {}: {e}", path.display()))
            });
        }
        Ok(self
            .query
            .clone()
            .unwrap_or_else(|| config.editor.initial_query.clone()))
    }

    /// Parses the screen size from the --size argument.
    pub fn parse_screen_size(&self) -> std::result::Result<(u16, u16), String> {
        let parts: Vec<&str> = self.size.split('x').collect();
        if parts.len() != 2 {
            return Err(format!(
                "Invalid size format: '{}'. Expected WIDTHxHEIGHT (e.g., 80x24)",
                self.size
            ));
        }
        let width = parts[0]
            .parse::<u16>()
            .map_err(|_| format!("Invalid width: '{}'", parts[0]))?;
        let height = parts[1]
            .parse::<u16>()
            .map_err(|_| format!("Invalid height: '{}'", parts[1]))?;
        Ok((width, height))
    }

    /// Parses the output format from the --output argument.
    pub fn parse_output_format(&self) -> std::result::Result<OutputFormat, String> {
        self.output.parse()
    }

    /// Validates the mode flags.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.headless && self.execute.is_some() {
            return Err("--headless and --execute cannot be combined".to_string());
        }

        let format = self.parse_output_format()?;

        if self.execute.is_some() && format == OutputFormat::Frames {
            return Err("--execute supports --output text or json".to_string());
        }

        if self.headless {
            if self.events.is_none() && self.script.is_none() {
                return Err("--headless requires --events or --script".to_string());
            }
            self.parse_screen_size()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Cli {
        Cli::parse_from(args)
    }

    #[test]
    fn test_defaults() {
        let cli = parse_args(&["scratchsql"]);
        assert!(cli.is_interactive());
        assert_eq!(cli.size, "100x30");
        assert_eq!(cli.parse_output_format().unwrap(), OutputFormat::Text);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_start_dir_precedence() {
        let mut config = Config::default();
        config.explorer.start_dir = PathBuf::from("/from/config");

        let cli = parse_args(&["scratchsql"]);
        assert_eq!(cli.start_dir(&config), PathBuf::from("/from/config"));

        let cli = parse_args(&["scratchsql", "--dir", "/from/cli"]);
        assert_eq!(cli.start_dir(&config), PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_initial_query_precedence() {
        let config = Config::default();
        let cli = parse_args(&["scratchsql"]);
        assert_eq!(cli.initial_query(&config).unwrap(), config.editor.initial_query);

        let cli = parse_args(&["scratchsql", "-q", "SELECT 2"]);
        assert_eq!(cli.initial_query(&config).unwrap(), "SELECT 2");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.sql");
        std::fs::write(&path, "SELECT 3").unwrap();
        let cli = parse_args(&[
            "scratchsql",
            "-q",
            "SELECT 2",
            "--file",
            path.to_str().unwrap(),
        ]);
        assert_eq!(cli.initial_query(&config).unwrap(), "SELECT 3");
    }

    #[test]
    fn test_initial_query_missing_file() {
        let cli = parse_args(&["scratchsql", "--file", "/definitely/not/here.sql"]);
        let err = cli.initial_query(&Config::default()).unwrap_err();
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_execute_mode() {
        let cli = parse_args(&["scratchsql", "-e", "SELECT 1", "--output", "json"]);
        assert_eq!(cli.execute.as_deref(), Some("SELECT 1"));
        assert!(!cli.is_interactive());
        assert!(cli.validate().is_ok());

        let cli = parse_args(&["scratchsql", "-e", "SELECT 1", "--output", "frames"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_parse_screen_size() {
        let cli = parse_args(&["scratchsql", "--size", "120x40"]);
        assert_eq!(cli.parse_screen_size().unwrap(), (120, 40));

        let cli = parse_args(&["scratchsql", "--size", "invalid"]);
        assert!(cli.parse_screen_size().is_err());
    }

    #[test]
    fn test_validate_headless_requires_events_or_script() {
        let cli = parse_args(&["scratchsql", "--headless"]);
        let result = cli.validate();
        assert!(result.unwrap_err().contains("requires --events or --script"));

        let cli = parse_args(&["scratchsql", "--headless", "--events", "key:f5"]);
        assert!(cli.validate().is_ok());

        let cli = parse_args(&["scratchsql", "--headless", "--script", "-"]);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_headless_and_execute_conflict() {
        let cli = parse_args(&["scratchsql", "--headless", "--events", "key:f5", "-e", "SELECT 1"]);
        assert!(cli.validate().is_err());
    }
}
