//! Toast notification widget for the TUI.
//!
//! Displays temporary messages that auto-dismiss.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Severity of a toast, which picks its border color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
}

impl ToastLevel {
    fn color(self) -> Color {
        match self {
            Self::Info => Color::Green,
            Self::Warning => Color::Yellow,
        }
    }
}

/// Toast notification widget.
pub struct Toast<'a> {
    message: &'a str,
    level: ToastLevel,
}

impl<'a> Toast<'a> {
    /// Creates a new toast widget.
    pub fn new(message: &'a str, level: ToastLevel) -> Self {
        Self { message, level }
    }

    /// Calculates the area for the toast (bottom-right corner).
    pub fn area(screen: Rect) -> Rect {
        let width = 50.min(screen.width.saturating_sub(4));
        let height = 4.min(screen.height);
        let x = screen.width.saturating_sub(width + 2);
        let y = screen.height.saturating_sub(height + 1);
        Rect::new(x, y, width, height)
    }
}

impl Widget for Toast<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.level.color()))
            .style(Style::default().bg(Color::Black));

        let line = Line::from(vec![Span::styled(
            self.message,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )]);

        Paragraph::new(line)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_area() {
        let screen = Rect::new(0, 0, 80, 24);
        let area = Toast::area(screen);
        assert!(area.x > 0);
        assert!(area.y > 0);
        assert_eq!(area.height, 4);
        assert!(area.right() <= screen.right());
    }

    #[test]
    fn test_toast_renders_message() {
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        Toast::new("Copied path", ToastLevel::Info).render(area, &mut buf);

        let row: String = (0..40).map(|x| buf[(x, 1)].symbol()).collect();
        assert!(row.contains("Copied path"));
    }
}
