//! SQL editor pane.
//!
//! Renders the editor buffer with a line-number gutter and scrolls so the
//! cursor stays visible.

use crate::tui::editor::EditorBuffer;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Width of the line-number gutter, including the trailing space.
const GUTTER_WIDTH: u16 = 4;

/// Offset needed to keep `cursor` inside a window of `size` cells.
pub fn scroll_offset(cursor: usize, size: usize) -> usize {
    if size == 0 {
        cursor
    } else if cursor < size {
        0
    } else {
        cursor + 1 - size
    }
}

/// Editor pane widget.
pub struct EditorPane<'a> {
    buffer: &'a EditorBuffer,
    focused: bool,
}

impl<'a> EditorPane<'a> {
    pub fn new(buffer: &'a EditorBuffer, focused: bool) -> Self {
        Self { buffer, focused }
    }

    fn block(&self) -> Block<'static> {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Query ")
    }

    /// Text area inside the border, right of the gutter.
    fn text_area(&self, area: Rect) -> Rect {
        let inner = self.block().inner(area);
        Rect {
            x: inner.x + GUTTER_WIDTH.min(inner.width),
            width: inner.width.saturating_sub(GUTTER_WIDTH),
            ..inner
        }
    }

    fn offsets(&self, text: Rect) -> (usize, usize) {
        let (row, col) = self.buffer.cursor();
        (
            scroll_offset(row, text.height as usize),
            scroll_offset(col, text.width as usize),
        )
    }

    /// Screen position of the cursor when the pane occupies `area`.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let text = self.text_area(area);
        let (row, col) = self.buffer.cursor();
        let (row_offset, col_offset) = self.offsets(text);
        (
            text.x + (col - col_offset) as u16,
            text.y + (row - row_offset) as u16,
        )
    }
}

impl Widget for EditorPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.text_area(area);
        let (row_offset, col_offset) = self.offsets(text);
        let gutter_style = Style::default().fg(Color::DarkGray);

        let lines: Vec<Line> = self
            .buffer
            .lines()
            .iter()
            .enumerate()
            .skip(row_offset)
            .take(text.height as usize)
            .map(|(number, line)| {
                let visible: String = line.chars().skip(col_offset).collect();
                Line::from(vec![
                    Span::styled(format!("{:>3} ", number + 1), gutter_style),
                    Span::raw(visible),
                ])
            })
            .collect();

        Paragraph::new(lines).block(self.block()).render(area, buf);
    }
}
