//! Results pane: the error callout or the last result table.

use super::table::ResultTable;
use crate::db::QueryResult;
use crate::tui::results_view::ResultsView;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Results pane widget.
pub struct ResultsPane<'a> {
    result: &'a QueryResult,
    error: Option<&'a str>,
    view: Option<&'a ResultsView>,
    focused: bool,
}

impl<'a> ResultsPane<'a> {
    pub fn new(result: &'a QueryResult, error: Option<&'a str>) -> Self {
        Self {
            result,
            error,
            view: None,
            focused: false,
        }
    }

    /// Applies filter, sort and scroll.
    pub fn view(mut self, view: &'a ResultsView) -> Self {
        self.view = Some(view);
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for ResultsPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Results ");
        let inner = block.inner(area);
        block.render(area, buf);

        if let Some(error) = self.error {
            let lines = vec![
                Line::from(Span::styled(
                    "✗ Error",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    error.to_string(),
                    Style::default().fg(Color::Red),
                )),
            ];
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .render(inner, buf);
            return;
        }

        if self.result.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "Run a query with Ctrl+R or F5",
                Style::default().fg(Color::DarkGray),
            )))
            .render(inner, buf);
            return;
        }

        let default_view = ResultsView::default();
        let view = self.view.unwrap_or(&default_view);
        let rows = view.visible_rows(self.result);

        let table_area = if view.is_editing() || !view.filter().is_empty() {
            let [filter_area, table_area] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
            filter_line(view).render(filter_area, buf);
            table_area
        } else {
            inner
        };

        ResultTable::new(self.result)
            .rows(&rows)
            .scroll(view.scroll)
            .sort(view.sort())
            .render(table_area, buf);
    }
}

fn filter_line(view: &ResultsView) -> Line<'_> {
    let mut spans = vec![
        Span::styled("Filter: ", Style::default().fg(Color::Yellow)),
        Span::raw(view.filter()),
    ];
    if view.is_editing() {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}
