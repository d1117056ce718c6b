//! File explorer sidebar.
//!
//! Shows the current directory, an optional `..` row and the visible entries,
//! directories marked with a trailing slash.

use crate::browser::{DirEntry, PARENT};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use std::path::Path;

/// Explorer sidebar widget.
pub struct ExplorerPane<'a> {
    path: &'a Path,
    entries: &'a [DirEntry],
    has_parent: bool,
    selected: usize,
    focused: bool,
}

impl<'a> ExplorerPane<'a> {
    pub fn new(path: &'a Path, entries: &'a [DirEntry], has_parent: bool) -> Self {
        Self {
            path,
            entries,
            has_parent,
            selected: 0,
            focused: false,
        }
    }

    /// Index of the highlighted row, counting the `..` row when present.
    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn row_line(&self, index: usize, label: String, style: Style) -> Line<'a> {
        let is_selected = index == self.selected;
        let (marker, style) = if is_selected && self.focused {
            ("▸ ", style.add_modifier(Modifier::REVERSED))
        } else if is_selected {
            ("▸ ", style)
        } else {
            ("  ", style)
        };
        Line::from(vec![Span::raw(marker), Span::styled(label, style)])
    }
}

impl Widget for ExplorerPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Files ");
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        let path_line = Line::from(Span::styled(
            self.path.display().to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        buf.set_line(inner.x, inner.y, &path_line, inner.width);

        let dir_style = Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD);
        let mut rows = Vec::with_capacity(self.entries.len() + 1);
        if self.has_parent {
            rows.push(self.row_line(0, format!("{PARENT}/"), dir_style));
        }
        let offset = rows.len();
        for (i, entry) in self.entries.iter().enumerate() {
            let row = if entry.is_dir {
                self.row_line(offset + i, format!("{}/", entry.name), dir_style)
            } else {
                self.row_line(offset + i, entry.name.clone(), Style::default())
            };
            rows.push(row);
        }

        if rows.is_empty() {
            rows.push(Line::from(Span::styled(
                "(empty)",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let list_area = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };
        let visible = list_area.height as usize;
        let scroll = if visible > 0 && self.selected >= visible {
            self.selected + 1 - visible
        } else {
            0
        };

        Paragraph::new(rows)
            .scroll((scroll as u16, 0))
            .render(list_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(buf: &Buffer, area: Rect) -> Vec<String> {
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn test_renders_parent_and_entries() {
        let entries = vec![DirEntry::new("docs", true), DirEntry::new("a.sql", false)];
        let area = Rect::new(0, 0, 30, 8);
        let mut buf = Buffer::empty(area);
        ExplorerPane::new(Path::new("./work"), &entries, true)
            .selected(1)
            .focused(true)
            .render(area, &mut buf);

        let lines = screen(&buf, area);
        assert!(lines[1].contains("./work"));
        assert!(lines[2].contains("  ../"));
        assert!(lines[3].contains("▸ docs/"));
        assert!(lines[4].contains("  a.sql"));
    }

    #[test]
    fn test_renders_empty_directory() {
        let area = Rect::new(0, 0, 30, 6);
        let mut buf = Buffer::empty(area);
        ExplorerPane::new(Path::new("/"), &[], false).render(area, &mut buf);

        let lines = screen(&buf, area);
        assert!(lines[2].contains("(empty)"));
    }
}
