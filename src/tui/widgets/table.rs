//! Result table rendering.
//!
//! Renders a [`QueryResult`] as a box-drawn table with auto-sized columns and
//! styled NULL values. The same lines back the one-shot text output.

use crate::db::{QueryResult, Value};
use crate::tui::results_view::SortKey;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Maximum width for any column in the terminal UI.
const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Lines around the data rows: three above, the bottom border and the footer.
const CHROME_LINES: usize = 5;

/// Widget for rendering a query result as a table.
pub struct ResultTable<'a> {
    result: &'a QueryResult,
    /// Indices into `result.rows` in display order; all rows when `None`.
    order: Option<&'a [usize]>,
    scroll: usize,
    sort: Option<SortKey>,
    max_column_width: Option<usize>,
}

impl<'a> ResultTable<'a> {
    /// Creates a new result table widget.
    pub fn new(result: &'a QueryResult) -> Self {
        Self {
            result,
            order: None,
            scroll: 0,
            sort: None,
            max_column_width: Some(MAX_COLUMN_WIDTH),
        }
    }

    /// Shows only these rows, in this order.
    pub fn rows(mut self, order: &'a [usize]) -> Self {
        self.order = Some(order);
        self
    }

    /// Skips the first `scroll` shown rows.
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// Marks the sorted column in the header.
    pub fn sort(mut self, sort: Option<SortKey>) -> Self {
        self.sort = sort;
        self
    }

    fn text_width(s: &str) -> usize {
        s.chars().count()
    }

    fn shown_rows(&self) -> Box<dyn Iterator<Item = &'a [Value]> + 'a> {
        let rows = &self.result.rows;
        match self.order {
            Some(order) => Box::new(order.iter().filter_map(move |&i| rows.get(i).map(Vec::as_slice))),
            None => Box::new(rows.iter().map(Vec::as_slice)),
        }
    }

    fn shown_count(&self) -> usize {
        self.order.map_or(self.result.row_count(), <[usize]>::len)
    }

    fn header_label(&self, index: usize, name: &str) -> String {
        match self.sort {
            Some(key) if key.column == index => {
                format!("{name} {}", if key.descending { '▼' } else { '▲' })
            }
            _ => name.to_string(),
        }
    }

    /// Calculates the optimal width for each column.
    fn calculate_column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .result
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| Self::text_width(&self.header_label(i, &col.name)).max(MIN_COLUMN_WIDTH))
            .collect();

        for row in self.shown_rows() {
            for (width, value) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(Self::text_width(&value.to_display_string()));
            }
        }

        match self.max_column_width {
            Some(max) => widths.iter().map(|&w| w.min(max)).collect(),
            None => widths,
        }
    }

    /// Truncates a string to `max_width` characters, adding an ellipsis if needed.
    fn truncate(s: &str, max_width: usize) -> String {
        if Self::text_width(s) <= max_width {
            s.to_string()
        } else if max_width <= 3 {
            s.chars().take(max_width).collect()
        } else {
            let head: String = s.chars().take(max_width - 3).collect();
            format!("{head}...")
        }
    }

    /// Pads `s` with spaces to exactly `width` characters.
    fn pad(s: &str, width: usize) -> String {
        let fill = width.saturating_sub(Self::text_width(s));
        format!(" {}{} ", s, " ".repeat(fill))
    }

    fn footer(&self, page: Option<(usize, usize)>) -> String {
        let total = self.result.row_count();
        let mut footer = format!(
            "{} row{} returned ({}ms)",
            total,
            if total == 1 { "" } else { "s" },
            self.result.execution_time.as_millis()
        );

        let shown = self.shown_count();
        if shown != total {
            footer.push_str(&format!(" · {shown} matching"));
        }
        if let Some((first, last)) = page {
            footer.push_str(&format!(" · rows {first}-{last} of {shown}"));
        }
        footer
    }

    /// Renders the table to lines for embedding in other widgets.
    ///
    /// With `max_rows`, at most that many rows are drawn after the scroll
    /// offset and the footer shows which rows are on screen.
    pub fn render_to_lines(&self, available_width: usize, max_rows: Option<usize>) -> Vec<Line<'a>> {
        let mut lines = Vec::new();

        if self.result.columns.is_empty() {
            lines.push(Line::from(Span::styled(
                "(no columns returned)",
                Style::default().fg(Color::DarkGray),
            )));
            return lines;
        }

        let widths = self.calculate_column_widths();

        // Scale down proportionally when the table is wider than the panel
        let total_width: usize = widths.iter().sum::<usize>() + widths.len() * 3 + 1;
        let scale_factor = if total_width > available_width && available_width > 0 {
            available_width as f64 / total_width as f64
        } else {
            1.0
        };

        let adjusted_widths: Vec<usize> = widths
            .iter()
            .map(|&w| ((w as f64 * scale_factor) as usize).max(MIN_COLUMN_WIDTH))
            .collect();

        lines.push(self.render_border(&adjusted_widths, '┌', '┬', '┐'));
        lines.push(self.render_header_row(&adjusted_widths));
        lines.push(self.render_border(&adjusted_widths, '├', '┼', '┤'));

        let mut drawn = 0;
        for row in self
            .shown_rows()
            .skip(self.scroll)
            .take(max_rows.unwrap_or(usize::MAX))
        {
            lines.push(self.render_data_row(row, &adjusted_widths));
            drawn += 1;
        }

        lines.push(self.render_border(&adjusted_widths, '└', '┴', '┘'));

        let page = match max_rows {
            Some(_) if drawn > 0 => Some((self.scroll + 1, self.scroll + drawn)),
            _ => None,
        };
        lines.push(Line::from(Span::styled(
            self.footer(page),
            Style::default().fg(Color::DarkGray),
        )));

        lines
    }

    /// Renders every row as plain text without truncating values.
    pub fn render_plain(mut self, available_width: usize) -> String {
        self.max_column_width = None;
        self.render_to_lines(available_width, None)
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_border(&self, widths: &[usize], left: char, mid: char, right: char) -> Line<'a> {
        let mut border = String::new();
        border.push(left);

        for (i, &width) in widths.iter().enumerate() {
            border.push_str(&"─".repeat(width + 2));
            if i < widths.len() - 1 {
                border.push(mid);
            }
        }

        border.push(right);

        Line::from(Span::styled(border, Style::default().fg(Color::DarkGray)))
    }

    fn render_header_row(&self, widths: &[usize]) -> Line<'a> {
        let mut spans = vec![Span::styled("│", Style::default().fg(Color::DarkGray))];

        for (i, col) in self.result.columns.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(MIN_COLUMN_WIDTH);
            let name = Self::truncate(&self.header_label(i, &col.name), width);

            spans.push(Span::styled(
                Self::pad(&name, width),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }

        Line::from(spans)
    }

    fn render_data_row(&self, row: &[Value], widths: &[usize]) -> Line<'a> {
        let mut spans = vec![Span::styled("│", Style::default().fg(Color::DarkGray))];

        for (i, value) in row.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(MIN_COLUMN_WIDTH);
            let truncated = Self::truncate(&value.to_display_string(), width);

            let style = if value.is_null() {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };

            spans.push(Span::styled(Self::pad(&truncated, width), style));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }

        Line::from(spans)
    }
}

impl Widget for ResultTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let max_rows = (area.height as usize).saturating_sub(CHROME_LINES);
        let lines = self.render_to_lines(area.width as usize, Some(max_rows));

        for (i, line) in lines.iter().enumerate().take(area.height as usize) {
            buf.set_line(area.x, area.y + i as u16, line, area.width);
        }
    }
}
