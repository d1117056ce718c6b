//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components.

use super::app::{App, Focus};
use super::widgets::{
    editor::EditorPane, explorer::ExplorerPane, header::Header, results::ResultsPane,
    toast::Toast,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Main layout: header, content, key hints
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(6),    // Content (explorer + editor/results)
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    let content_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(28), Constraint::Percentage(72)])
        .split(main_layout[1]);

    let work_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(content_layout[1]);

    render_header(frame, main_layout[0], app);
    render_explorer(frame, content_layout[0], app);
    render_editor(frame, work_layout[0], app);
    render_results(frame, work_layout[1], app);
    render_hints(frame, main_layout[2], app);

    if let Some(toast) = &app.toast {
        frame.render_widget(Toast::new(&toast.message, toast.level), Toast::area(area));
    }
}

/// Renders the header bar.
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let widget = Header::new(app.engine_name, app.spinner.as_ref());
    frame.render_widget(widget, area);
}

/// Renders the file explorer.
fn render_explorer(frame: &mut Frame, area: Rect, app: &App) {
    let widget = ExplorerPane::new(
        app.browser.current_path(),
        app.browser.cached_listing(),
        app.browser.has_parent(),
    )
    .selected(app.explorer_selected)
    .focused(app.focus == Focus::Explorer);
    frame.render_widget(widget, area);
}

/// Renders the SQL editor and places the cursor in it when focused.
fn render_editor(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Editor;
    let widget = EditorPane::new(&app.editor, focused);
    let cursor = widget.cursor_position(area);
    frame.render_widget(widget, area);

    if focused {
        frame.set_cursor_position(cursor);
    }
}

/// Renders the results pane.
fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let widget = ResultsPane::new(app.runner.result(), app.runner.error())
        .view(&app.results)
        .focused(app.focus == Focus::Results);
    frame.render_widget(widget, area);
}

/// Renders the key hints for the focused panel.
fn render_hints(frame: &mut Frame, area: Rect, app: &App) {
    let panel_hints = match app.focus {
        Focus::Editor => "Ctrl+W delete word",
        Focus::Explorer => "↑/↓ select · Enter open · Backspace up · y copy path · r refresh",
        Focus::Results if app.results.is_editing() => "type to filter · Enter keep · Esc clear",
        Focus::Results => "↑/↓ PgUp/PgDn scroll · / filter · s sort · Esc clear filter",
    };
    let line = Line::from(vec![
        Span::styled(
            " Ctrl+R/F5 run · Tab focus · Ctrl+Q quit · ",
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(panel_hints, Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
