//! Output formatting for headless mode.
//!
//! Provides different output formats: text, JSON, and frames.

use super::{HeadlessResult, HeadlessState};
use crate::cli::OutputFormat;
use ratatui::buffer::Buffer;
use serde::Serialize;

/// Renders a ratatui buffer to a string.
pub struct ScreenRenderer;

impl ScreenRenderer {
    /// Renders a buffer to plain text, trimming trailing spaces and blank lines.
    pub fn render(buffer: &Buffer) -> String {
        let area = buffer.area;

        let mut lines: Vec<String> = (area.top()..area.bottom())
            .map(|y| {
                let line: String = (area.left()..area.right())
                    .filter_map(|x| buffer.cell((x, y)))
                    .map(|cell| cell.symbol())
                    .collect();
                line.trim_end_matches(' ').to_string()
            })
            .collect();

        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        format!("{}\n", lines.join("\n"))
    }
}

/// JSON output structure.
#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    screen: &'a str,
    screen_lines: Vec<&'a str>,
    events_executed: usize,
    duration_ms: u64,
    assertions: AssertionSummary<'a>,
    state: &'a HeadlessState,
}

#[derive(Debug, Serialize)]
struct AssertionSummary<'a> {
    passed: usize,
    failed: usize,
    failures: &'a [String],
}

/// Formats headless execution results.
pub struct HeadlessOutput {
    format: OutputFormat,
}

impl HeadlessOutput {
    /// Creates a new output formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result according to the configured format.
    pub fn format(&self, result: &HeadlessResult) -> String {
        match self.format {
            OutputFormat::Text => Self::format_text(result),
            OutputFormat::Json => Self::format_json(result),
            OutputFormat::Frames => Self::format_frames(result),
        }
    }

    fn assertion_summary(result: &HeadlessResult) -> Option<String> {
        if result.assertions_passed == 0 && result.assertions_failed == 0 {
            return None;
        }
        let mut summary = format!(
            "Assertions: {} passed, {} failed",
            result.assertions_passed, result.assertions_failed
        );
        for failure in &result.failures {
            summary.push_str(&format!("\n  FAILED {failure}"));
        }
        Some(summary)
    }

    fn format_text(result: &HeadlessResult) -> String {
        let mut text = format!(
            "{}\nEvents: {} executed in {}ms\n",
            result.screen,
            result.events_executed,
            result.duration.as_millis()
        );
        if let Some(summary) = Self::assertion_summary(result) {
            text.push_str(&summary);
            text.push('\n');
        }
        text
    }

    fn format_json(result: &HeadlessResult) -> String {
        let json_output = JsonOutput {
            screen: &result.screen,
            screen_lines: result.screen.lines().collect(),
            events_executed: result.events_executed,
            duration_ms: result.duration.as_millis() as u64,
            assertions: AssertionSummary {
                passed: result.assertions_passed,
                failed: result.assertions_failed,
                failures: &result.failures,
            },
            state: &result.state,
        };

        serde_json::to_string_pretty(&json_output)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}"))
    }

    fn format_frames(result: &HeadlessResult) -> String {
        let mut text: String = result
            .frames
            .iter()
            .map(|frame| {
                let event_desc = frame.event.as_deref().unwrap_or("initial");
                format!(
                    "=== FRAME {} ({}) ===\n{}\n",
                    frame.number, event_desc, frame.screen
                )
            })
            .collect();

        text.push_str(&format!(
            "Total: {} frames, {} events executed in {}ms\n",
            result.frames.len(),
            result.events_executed,
            result.duration.as_millis()
        ));
        if let Some(summary) = Self::assertion_summary(result) {
            text.push_str(&summary);
            text.push('\n');
        }
        text
    }
}
