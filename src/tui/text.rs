//! Text editing state for the form fields, prompts and the SQL editor.
//!
//! Cursors are character indices, never byte offsets, so multi-byte input
//! (accented names, CJK identifiers) edits correctly.

/// Converts a character index into a byte offset within `text`.
fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Find the start position of the word before the cursor.
///
/// Words are delimited by whitespace; punctuation is part of the word.
pub fn find_word_start_backward(text: &str, cursor: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut pos = cursor.min(chars.len());

    while pos > 0 && chars[pos - 1].is_whitespace() {
        pos -= 1;
    }
    while pos > 0 && !chars[pos - 1].is_whitespace() {
        pos -= 1;
    }

    pos
}

/// Single-line input state.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    /// Current input text.
    pub text: String,
    /// Cursor position (character index).
    pub cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an input pre-filled with `text`, cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let at = byte_offset(&self.text, self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = byte_offset(&self.text, self.cursor);
            self.text.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = byte_offset(&self.text, self.cursor);
            self.text.remove(at);
        }
    }

    /// Deletes the word before the cursor (Ctrl+W).
    pub fn delete_word(&mut self) {
        let start = find_word_start_backward(&self.text, self.cursor);
        let from = byte_offset(&self.text, start);
        let to = byte_offset(&self.text, self.cursor);
        self.text.replace_range(from..to, "");
        self.cursor = start;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Multi-line SQL editor state.
#[derive(Debug, Clone)]
pub struct TextEditor {
    lines: Vec<String>,
    /// Cursor row.
    pub row: usize,
    /// Cursor column (character index within the row).
    pub col: usize,
}

impl Default for TextEditor {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        }
    }
}

impl TextEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an editor holding `text`, cursor at the end.
    pub fn with_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.split('\n').map(String::from).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        let row = lines.len() - 1;
        let col = lines[row].chars().count();
        Self { lines, row, col }
    }

    /// Returns the full text, rows joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let line = &mut self.lines[self.row];
        let at = byte_offset(line, self.col);
        line.insert(at, c);
        self.col += 1;
    }

    pub fn newline(&mut self) {
        let line = &mut self.lines[self.row];
        let at = byte_offset(line, self.col);
        let rest = line.split_off(at);
        self.row += 1;
        self.lines.insert(self.row, rest);
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            let line = &mut self.lines[self.row];
            let at = byte_offset(line, self.col);
            line.remove(at);
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&current);
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.line_len(self.row) {
            let line = &mut self.lines[self.row];
            let at = byte_offset(line, self.col);
            line.remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.line_len(self.row);
    }

    /// Clears the editor.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_word_start_backward() {
        assert_eq!(find_word_start_backward("hello world", 11), 6);
        assert_eq!(find_word_start_backward("hello world  ", 13), 6);
        assert_eq!(find_word_start_backward("hello", 0), 0);
    }

    #[test]
    fn test_input_insert() {
        let mut input = InputState::new();
        input.insert('h');
        input.insert('i');
        assert_eq!(input.text, "hi");
        assert_eq!(input.cursor, 2);
    }

    #[test]
    fn test_input_multibyte() {
        let mut input = InputState::with_text("zoë");
        input.insert('!');
        assert_eq!(input.text, "zoë!");
        input.move_left();
        input.move_left();
        input.backspace();
        assert_eq!(input.text, "zë!");
        input.delete();
        assert_eq!(input.text, "z!");
    }

    #[test]
    fn test_input_backspace_at_start() {
        let mut input = InputState::with_text("hello");
        input.move_home();
        input.backspace();
        assert_eq!(input.text, "hello");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_input_delete_word() {
        let mut input = InputState::with_text("./out dir/result.csv");
        input.delete_word();
        assert_eq!(input.text, "./out ");
        assert_eq!(input.cursor, 6);
    }

    #[test]
    fn test_input_cursor_movement() {
        let mut input = InputState::with_text("hello");
        input.cursor = 2;

        input.move_left();
        assert_eq!(input.cursor, 1);
        input.move_right();
        assert_eq!(input.cursor, 2);
        input.move_home();
        assert_eq!(input.cursor, 0);
        input.move_end();
        assert_eq!(input.cursor, 5);
    }

    #[test]
    fn test_editor_newline_and_text() {
        let mut editor = TextEditor::new();
        for c in "SELECT 1;".chars() {
            editor.insert(c);
        }
        editor.move_left();
        editor.newline();
        assert_eq!(editor.text(), "SELECT 1\n;");
        assert_eq!((editor.row, editor.col), (1, 0));
    }

    #[test]
    fn test_editor_backspace_joins_lines() {
        let mut editor = TextEditor::with_text("SELECT\n1");
        editor.move_home();
        editor.backspace();
        assert_eq!(editor.text(), "SELECT1");
        assert_eq!((editor.row, editor.col), (0, 6));
    }

    #[test]
    fn test_editor_delete_joins_lines() {
        let mut editor = TextEditor::with_text("a\nb");
        editor.move_up();
        editor.move_end();
        editor.delete();
        assert_eq!(editor.text(), "ab");
    }

    #[test]
    fn test_editor_vertical_movement_clamps_column() {
        let mut editor = TextEditor::with_text("SELECT *\nFROM t");
        editor.move_up();
        assert_eq!((editor.row, editor.col), (0, 6));
        editor.move_end();
        editor.move_down();
        assert_eq!((editor.row, editor.col), (1, 6));
    }

    #[test]
    fn test_editor_clear() {
        let mut editor = TextEditor::with_text("SELECT 1");
        editor.clear();
        assert_eq!(editor.text(), "");
        assert_eq!(editor.lines().len(), 1);
    }
}
