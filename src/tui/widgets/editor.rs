//! SQL editor widget.

use crate::tui::text::TextEditor;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Computes the first visible row and column so the cursor stays in view.
pub fn scroll_offsets(editor: &TextEditor, inner: Rect) -> (usize, usize) {
    let height = inner.height.max(1) as usize;
    let width = inner.width.max(1) as usize;
    let row = (editor.row + 1).saturating_sub(height);
    let col = (editor.col + 1).saturating_sub(width);
    (row, col)
}

/// Multi-line SQL editor panel.
pub struct SqlEditor<'a> {
    editor: &'a TextEditor,
    focused: bool,
}

impl<'a> SqlEditor<'a> {
    pub fn new(editor: &'a TextEditor, focused: bool) -> Self {
        Self { editor, focused }
    }

    pub fn block(focused: bool) -> Block<'static> {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" SQL ")
    }
}

impl Widget for SqlEditor<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Self::block(self.focused);
        let inner = block.inner(area);
        let (row_offset, col_offset) = scroll_offsets(self.editor, inner);

        let lines: Vec<Line> = self
            .editor
            .lines()
            .iter()
            .skip(row_offset)
            .take(inner.height as usize)
            .map(|l| Line::from(l.chars().skip(col_offset).collect::<String>()))
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_offsets_follow_cursor() {
        let editor = TextEditor::with_text("a\nb\nc\nd\nlonger line");
        let inner = Rect::new(0, 0, 5, 3);
        assert_eq!(scroll_offsets(&editor, inner), (2, 7));

        let editor = TextEditor::with_text("SELECT 1;");
        assert_eq!(scroll_offsets(&editor, Rect::new(0, 0, 40, 5)), (0, 0));
    }
}
