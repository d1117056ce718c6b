//! Multi-line text buffer behind the SQL editor pane.
//!
//! The cursor is a (row, column) pair where the column counts characters, not
//! bytes. Word movement treats whitespace as the only delimiter, so
//! punctuation such as `t.id` stays part of a word.

/// Editable lines of text with a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        }
    }
}

/// Byte offset of the `col`-th character of `line`.
fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

impl EditorBuffer {
    /// Creates a buffer holding `text` with the cursor at its end.
    pub fn new(text: &str) -> Self {
        let mut buffer = Self::default();
        buffer.set_text(text);
        buffer
    }

    /// Replaces the whole buffer and moves the cursor to the end.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(String::from).collect();
        self.row = self.lines.len() - 1;
        self.col = char_len(&self.lines[self.row]);
    }

    /// The buffer contents joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Cursor as (row, character column).
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// True when the buffer holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    fn current_line(&self) -> &str {
        &self.lines[self.row]
    }

    fn current_len(&self) -> usize {
        char_len(self.current_line())
    }

    /// Inserts a character at the cursor. `\n` splits the line.
    pub fn insert(&mut self, c: char) {
        if c == '\n' {
            self.newline();
            return;
        }
        let at = byte_index(&self.lines[self.row], self.col);
        self.lines[self.row].insert(at, c);
        self.col += 1;
    }

    /// Inserts every character of `text` at the cursor.
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            self.insert(c);
        }
    }

    /// Splits the current line at the cursor.
    pub fn newline(&mut self) {
        let at = byte_index(&self.lines[self.row], self.col);
        let rest = self.lines[self.row].split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    /// Deletes the character before the cursor, joining lines at column 0.
    pub fn backspace(&mut self) {
        if self.col > 0 {
            let at = byte_index(&self.lines[self.row], self.col - 1);
            self.lines[self.row].remove(at);
            self.col -= 1;
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.current_len();
            self.lines[self.row].push_str(&line);
        }
    }

    /// Deletes the character under the cursor, joining lines at the end.
    pub fn delete(&mut self) {
        if self.col < self.current_len() {
            let at = byte_index(&self.lines[self.row], self.col);
            self.lines[self.row].remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    /// Deletes from the start of the previous word up to the cursor.
    pub fn delete_word_backward(&mut self) {
        if self.col == 0 {
            self.backspace();
            return;
        }
        let start = self.word_start_backward();
        let line = &mut self.lines[self.row];
        let from = byte_index(line, start);
        let to = byte_index(line, self.col);
        line.replace_range(from..to, "");
        self.col = start;
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.current_len();
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.current_len() {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.current_len());
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.current_len());
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.current_len();
    }

    /// Moves to the start of the previous word on the current line.
    pub fn move_word_left(&mut self) {
        if self.col == 0 {
            self.move_left();
        } else {
            self.col = self.word_start_backward();
        }
    }

    /// Moves past the end of the next word on the current line.
    pub fn move_word_right(&mut self) {
        if self.col == self.current_len() {
            self.move_right();
        } else {
            self.col = self.word_end_forward();
        }
    }

    fn word_start_backward(&self) -> usize {
        let chars: Vec<char> = self.current_line().chars().collect();
        let mut pos = self.col;
        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        pos
    }

    fn word_end_forward(&self) -> usize {
        let chars: Vec<char> = self.current_line().chars().collect();
        let mut pos = self.col;
        while pos < chars.len() && chars[pos].is_whitespace() {
            pos += 1;
        }
        while pos < chars.len() && !chars[pos].is_whitespace() {
            pos += 1;
        }
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_places_cursor_at_end() {
        let buffer = EditorBuffer::new("SELECT 1\nFROM t");
        assert_eq!(buffer.lines(), &["SELECT 1", "FROM t"]);
        assert_eq!(buffer.cursor(), (1, 6));
        assert_eq!(buffer.text(), "SELECT 1\nFROM t");
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = EditorBuffer::new("");
        assert!(buffer.is_empty());
        assert_eq!(buffer.cursor(), (0, 0));
    }

    #[test]
    fn test_insert_and_newline() {
        let mut buffer = EditorBuffer::default();
        buffer.insert_str("SELECT 1;");
        buffer.move_left();
        buffer.newline();
        assert_eq!(buffer.text(), "SELECT 1\n;");
        assert_eq!(buffer.cursor(), (1, 0));
    }

    #[test]
    fn test_insert_multibyte() {
        let mut buffer = EditorBuffer::new("'é'");
        buffer.move_left();
        buffer.insert('x');
        assert_eq!(buffer.text(), "'éx'");
        buffer.backspace();
        buffer.backspace();
        assert_eq!(buffer.text(), "''");
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut buffer = EditorBuffer::new("SELECT\n1");
        buffer.move_home();
        buffer.backspace();
        assert_eq!(buffer.text(), "SELECT1");
        assert_eq!(buffer.cursor(), (0, 6));

        buffer.move_home();
        buffer.backspace();
        assert_eq!(buffer.text(), "SELECT1");
    }

    #[test]
    fn test_delete_joins_lines() {
        let mut buffer = EditorBuffer::new("a\nb");
        buffer.move_up();
        buffer.move_end();
        buffer.delete();
        assert_eq!(buffer.text(), "ab");

        buffer.move_home();
        buffer.delete();
        assert_eq!(buffer.text(), "b");
    }

    #[test]
    fn test_vertical_movement_clamps_column() {
        let mut buffer = EditorBuffer::new("SELECT *\nFROM t\nWHERE x = 1");
        buffer.move_up();
        assert_eq!(buffer.cursor(), (1, 6));
        buffer.move_up();
        assert_eq!(buffer.cursor(), (0, 6));
        buffer.move_up();
        assert_eq!(buffer.cursor(), (0, 6));
        buffer.move_end();
        buffer.move_down();
        assert_eq!(buffer.cursor(), (1, 6));
    }

    #[test]
    fn test_horizontal_movement_wraps() {
        let mut buffer = EditorBuffer::new("ab\ncd");
        buffer.move_home();
        buffer.move_left();
        assert_eq!(buffer.cursor(), (0, 2));
        buffer.move_right();
        assert_eq!(buffer.cursor(), (1, 0));
    }

    #[test]
    fn test_word_movement() {
        let mut buffer = EditorBuffer::new("SELECT t.id  FROM t");
        buffer.move_word_left();
        assert_eq!(buffer.cursor(), (0, 18));
        buffer.move_word_left();
        assert_eq!(buffer.cursor(), (0, 13));
        buffer.move_word_left();
        assert_eq!(buffer.cursor(), (0, 7));
        buffer.move_word_right();
        assert_eq!(buffer.cursor(), (0, 11));
    }

    #[test]
    fn test_delete_word_backward() {
        let mut buffer = EditorBuffer::new("SELECT name  ");
        buffer.delete_word_backward();
        assert_eq!(buffer.text(), "SELECT ");
        buffer.delete_word_backward();
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn test_set_text_replaces_everything() {
        let mut buffer = EditorBuffer::new("old");
        buffer.set_text("SELECT 2;\n");
        assert_eq!(buffer.lines().len(), 2);
        assert_eq!(buffer.cursor(), (1, 0));
    }
}
