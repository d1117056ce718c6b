//! Headless mode for scripted testing and automation.
//!
//! Runs the TUI against a `TestBackend`, executing scripted events and
//! capturing the rendered screen. Queries are awaited inline and clipboard
//! copies are only recorded, so a script is fully deterministic.

mod events;
mod output;

pub use events::{Assertion, Event, EventParser};
pub use output::{HeadlessOutput, ScreenRenderer};

use crate::cli::{Cli, OutputFormat};
use crate::db::SqlEngine;
use crate::error::{ScratchError, Result};
use crate::tui::app::{Action, App, Focus};
use crate::tui::ui;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Configuration for headless mode execution.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Screen width in columns.
    pub width: u16,
    /// Screen height in rows.
    pub height: u16,
    pub output_format: OutputFormat,
    /// Whether to stop on first assertion failure.
    pub fail_fast: bool,
    /// Path to write output (None = stdout).
    pub output_file: Option<PathBuf>,
}

impl HeadlessConfig {
    /// Creates a HeadlessConfig from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let (width, height) = cli.parse_screen_size().map_err(ScratchError::config)?;
        let output_format = cli.parse_output_format().map_err(ScratchError::config)?;

        Ok(Self {
            width,
            height,
            output_format,
            fail_fast: cli.fail_fast,
            output_file: cli.output_file.clone(),
        })
    }
}

/// Result of headless execution.
#[derive(Debug)]
pub struct HeadlessResult {
    /// Final screen content as text.
    pub screen: String,
    /// Number of events executed.
    pub events_executed: usize,
    /// Total execution duration.
    pub duration: Duration,
    pub assertions_passed: usize,
    pub assertions_failed: usize,
    /// Failed assertions, in DSL form.
    pub failures: Vec<String>,
    /// Application state snapshot.
    pub state: HeadlessState,
    /// Frame captures (for frames output mode).
    pub frames: Vec<Frame>,
}

/// Snapshot of application state, used by state assertions and JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadlessState {
    /// Current editor text.
    pub query_text: String,
    /// Focused panel.
    pub focus: String,
    /// Whether a query is in flight.
    pub is_busy: bool,
    /// Last error message, empty when none.
    pub error: String,
    pub row_count: usize,
    pub column_count: usize,
    /// Result rows passing the results filter.
    pub visible_rows: usize,
    /// Results filter text, empty when none.
    pub filter: String,
    /// Results sort such as `id desc`, empty when unsorted.
    pub sort: String,
    /// Directory shown in the explorer.
    pub current_path: String,
    /// Visible entries in the explorer, excluding `..`.
    pub entry_count: usize,
    pub explorer_selected: usize,
    /// Last copied path, empty when none.
    pub last_copied: String,
    /// Whether the app is still running.
    pub running: bool,
}

impl HeadlessState {
    pub fn from_app(app: &App) -> Self {
        let result = app.runner.result();
        Self {
            query_text: app.runner.query().to_string(),
            focus: format!("{:?}", app.focus),
            is_busy: app.runner.is_busy(),
            error: app.runner.error().unwrap_or_default().to_string(),
            row_count: result.row_count(),
            column_count: result.column_count(),
            visible_rows: app.visible_row_count(),
            filter: app.results.filter().to_string(),
            sort: app.results.describe_sort(result).unwrap_or_default(),
            current_path: app.browser.current_path().display().to_string(),
            entry_count: app.browser.cached_listing().len(),
            explorer_selected: app.explorer_selected,
            last_copied: app
                .last_copied
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            running: app.running,
        }
    }

    /// Looks up a field by name, as a string.
    pub fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "query_text" => self.query_text.clone(),
            "focus" => self.focus.clone(),
            "is_busy" => self.is_busy.to_string(),
            "error" => self.error.clone(),
            "row_count" => self.row_count.to_string(),
            "column_count" => self.column_count.to_string(),
            "visible_rows" => self.visible_rows.to_string(),
            "filter" => self.filter.clone(),
            "sort" => self.sort.clone(),
            "current_path" => self.current_path.clone(),
            "entry_count" => self.entry_count.to_string(),
            "explorer_selected" => self.explorer_selected.to_string(),
            "last_copied" => self.last_copied.clone(),
            "running" => self.running.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

/// A captured frame (screen state after an event).
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame number (0 = initial state).
    pub number: usize,
    /// Event that produced this frame (None for initial).
    pub event: Option<String>,
    /// Screen content.
    pub screen: String,
}

/// Runs the TUI in headless mode.
pub struct HeadlessRunner {
    config: HeadlessConfig,
    terminal: Terminal<TestBackend>,
    app: App,
    engine: Arc<dyn SqlEngine>,
    events: Vec<Event>,
    frames: Vec<Frame>,
    assertions_passed: usize,
    assertions_failed: usize,
    failures: Vec<String>,
}

impl HeadlessRunner {
    /// Creates a new headless runner with the given configuration.
    pub fn new(config: HeadlessConfig, app: App, engine: Arc<dyn SqlEngine>) -> Result<Self> {
        let backend = TestBackend::new(config.width, config.height);
        let terminal = Terminal::new(backend)
            .map_err(|e| ScratchError::internal(format!("Failed to create test terminal: {e}")))?;

        Ok(Self {
            config,
            terminal,
            app,
            engine,
            events: Vec::new(),
            frames: Vec::new(),
            assertions_passed: 0,
            assertions_failed: 0,
            failures: Vec::new(),
        })
    }

    /// Loads events from a string (comma-separated or newline-separated).
    pub fn load_events(&mut self, input: &str) -> Result<()> {
        self.events = EventParser::new().parse_all(input)?;
        Ok(())
    }

    /// Loads events from a script file, or stdin for `-`.
    pub fn load_script(&mut self, path: &str) -> Result<()> {
        let content = if path == "-" {
            std::io::read_to_string(std::io::stdin())
                .map_err(|e| ScratchError::config(format!("Failed to read stdin: {e}")))?
        } else {
            std::fs::read_to_string(path)
                .map_err(|e| ScratchError::config(format!("Failed to read script file: {e}")))?
        };

        self.load_events(&content)
    }

    /// Runs the headless execution and returns the result.
    pub async fn run(mut self) -> Result<HeadlessResult> {
        let start_time = Instant::now();
        self.capture_frame(None)?;

        let events = std::mem::take(&mut self.events);
        let mut events_executed = 0;

        for event in events {
            let event_str = event.to_string();
            debug!("Headless event: {}", event_str);

            match &event {
                Event::Key(key) => self.press(*key).await,
                Event::Type(text) => self.type_text(text).await,
                Event::Wait(duration) => {
                    tokio::time::sleep(*duration).await;
                    self.app.handle_event(crate::tui::Event::Tick);
                }
                Event::Resize(w, h) => {
                    self.terminal
                        .resize(Rect::new(0, 0, *w, *h))
                        .map_err(|e| ScratchError::internal(format!("Resize failed: {e}")))?;
                }
                Event::Snapshot(name) => {
                    info!("Snapshot '{}' at event {}", name, events_executed);
                }
                Event::Assert(assertion) => {
                    self.draw()?;
                    let screen = self.render_screen();
                    let state = HeadlessState::from_app(&self.app);
                    if assertion.check(&screen, &state) {
                        self.assertions_passed += 1;
                    } else {
                        warn!("Assertion failed: {}", event_str);
                        self.assertions_failed += 1;
                        self.failures.push(event_str.clone());
                    }
                }
            }

            events_executed += 1;
            self.draw()?;

            if self.config.output_format == OutputFormat::Frames {
                self.capture_frame(Some(event_str))?;
            }

            if !self.app.running || (self.config.fail_fast && self.assertions_failed > 0) {
                break;
            }
        }

        self.draw()?;

        Ok(HeadlessResult {
            screen: self.render_screen(),
            events_executed,
            duration: start_time.elapsed(),
            assertions_passed: self.assertions_passed,
            assertions_failed: self.assertions_failed,
            failures: self.failures,
            state: HeadlessState::from_app(&self.app),
            frames: self.frames,
        })
    }

    /// Sends a key to the app and carries out the resulting action inline.
    async fn press(&mut self, key: KeyEvent) {
        let action = self.app.handle_event(crate::tui::Event::Key(key));
        match action {
            Some(Action::RunQuery) => {
                if let Some(pending) = self.app.start_query() {
                    let outcome = pending.run(self.engine.as_ref()).await;
                    self.app.complete_query(&pending, outcome);
                }
            }
            Some(Action::CopyPath(path)) => self.app.record_copy(path, Ok(())),
            None => {}
        }
    }

    /// Types into the editor directly, or as key presses into other panels.
    async fn type_text(&mut self, text: &str) {
        if self.app.focus == Focus::Editor {
            self.app.type_text(text);
            return;
        }
        for c in text.chars() {
            self.press(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .await;
        }
    }

    fn draw(&mut self) -> Result<()> {
        let app = &self.app;
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| ScratchError::internal(format!("Failed to render: {e}")))?;
        Ok(())
    }

    fn render_screen(&self) -> String {
        ScreenRenderer::render(self.terminal.backend().buffer())
    }

    fn capture_frame(&mut self, event: Option<String>) -> Result<()> {
        self.draw()?;
        let screen = self.render_screen();
        let number = self.frames.len();
        self.frames.push(Frame {
            number,
            event,
            screen,
        });
        Ok(())
    }
}

/// Runs headless mode and returns the process exit code.
pub async fn run_headless(cli: &Cli, app: App, engine: Arc<dyn SqlEngine>) -> Result<i32> {
    let config = HeadlessConfig::from_cli(cli)?;
    let mut runner = HeadlessRunner::new(config.clone(), app, engine)?;

    if let Some(events) = &cli.events {
        runner.load_events(events)?;
    } else if let Some(script_path) = &cli.script {
        runner.load_script(script_path)?;
    }

    let result = runner.run().await?;
    let output = HeadlessOutput::new(config.output_format).format(&result);

    if let Some(path) = &config.output_file {
        std::fs::write(path, &output)
            .map_err(|e| ScratchError::internal(format!("Failed to write output file: {e}")))?;
    } else {
        print!("{output}");
    }

    Ok(if result.assertions_failed > 0 { 1 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FailingEngine, MockEngine, SqliteEngine};
    use std::fs;

    fn config() -> HeadlessConfig {
        HeadlessConfig {
            width: 100,
            height: 30,
            output_format: OutputFormat::Text,
            fail_fast: false,
            output_file: None,
        }
    }

    async fn run_script(engine: Arc<dyn SqlEngine>, dir: &std::path::Path, script: &str) -> HeadlessResult {
        let app = App::new("SELECT 'hello'", dir, engine.name());
        let mut runner = HeadlessRunner::new(config(), app, engine).unwrap();
        runner.load_events(script).unwrap();
        runner.run().await.unwrap()
    }

    #[tokio::test]
    async fn test_run_query_with_f5() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_script(
            Arc::new(MockEngine::new()),
            dir.path(),
            "key:f5,assert:state:row_count=1,assert:contains:result",
        )
        .await;

        assert_eq!(result.assertions_passed, 2, "{:?}", result.failures);
        assert_eq!(result.assertions_failed, 0);
        assert!(!result.state.is_busy);
    }

    #[tokio::test]
    async fn test_failed_query_shows_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_script(
            Arc::new(FailingEngine::new("syntax error")),
            dir.path(),
            "key:ctrl+r,assert:contains:Execution failed: syntax error",
        )
        .await;

        assert_eq!(result.assertions_failed, 0, "{:?}", result.failures);
        assert_eq!(result.state.error, "Execution failed: syntax error");
        assert_eq!(result.state.row_count, 0);
    }

    #[tokio::test]
    async fn test_explorer_copy_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data.csv"), "").unwrap();

        let result = run_script(
            Arc::new(MockEngine::new()),
            dir.path(),
            "key:tab,key:down,type:y,assert:state:entry_count=1",
        )
        .await;

        assert_eq!(result.assertions_failed, 0, "{:?}", result.failures);
        assert_eq!(
            result.state.last_copied,
            dir.path().join("data.csv").display().to_string()
        );
    }

    #[tokio::test]
    async fn test_fail_fast_stops() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new("", dir.path(), "mock");
        let mut runner = HeadlessRunner::new(
            HeadlessConfig {
                fail_fast: true,
                ..config()
            },
            app,
            Arc::new(MockEngine::new()),
        )
        .unwrap();
        runner
            .load_events("assert:contains:not on screen,key:f5")
            .unwrap();
        let result = runner.run().await.unwrap();

        assert_eq!(result.events_executed, 1);
        assert_eq!(result.failures, vec!["assert:contains:not on screen"]);
    }

    #[tokio::test]
    async fn test_quit_stops_execution() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_script(Arc::new(MockEngine::new()), dir.path(), "key:ctrl+q,key:f5").await;

        assert_eq!(result.events_executed, 1);
        assert!(!result.state.running);
    }

    #[tokio::test]
    async fn test_results_filter_and_sort() {
        let dir = tempfile::tempdir().unwrap();
        let engine: Arc<dyn SqlEngine> = Arc::new(SqliteEngine::new());
        let app = App::new(
            "SELECT 1 AS n UNION ALL SELECT 12 UNION ALL SELECT 3",
            dir.path(),
            engine.name(),
        );
        let mut runner = HeadlessRunner::new(config(), app, engine).unwrap();
        runner
            .load_events(
                "key:f5,key:tab,key:tab,type:ss,key:/,type:1,key:enter,\
                 assert:state:visible_rows=2,assert:state:filter=1,assert:state:sort=n desc,\
                 assert:contains:2 matching",
            )
            .unwrap();
        let result = runner.run().await.unwrap();

        assert_eq!(result.assertions_failed, 0, "{:?}", result.failures);
        assert_eq!(result.state.row_count, 3);
        let twelve = result.screen.find("│ 12 ").unwrap();
        let one = result.screen.find("│ 1 ").unwrap();
        assert!(twelve < one, "descending order:\n{}", result.screen);
    }

    #[test]
    fn test_state_field_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new("SELECT 1", dir.path(), "mock");
        let state = HeadlessState::from_app(&app);

        assert_eq!(state.field("query_text").as_deref(), Some("SELECT 1"));
        assert_eq!(state.field("focus").as_deref(), Some("Editor"));
        assert_eq!(state.field("is_busy").as_deref(), Some("false"));
        assert_eq!(state.field("nope"), None);
    }
}
