//! Result table widget for the TUI.
//!
//! Renders query results as formatted tables with column headers and
//! auto-sized columns. Rows shorter than the header render as blank cells.
//! The same line rendering backs the `table` output format of the CLI.
//!
//! Widths are measured in terminal cells, so wide (CJK) text keeps the grid aligned.

use crate::mysql::QueryResult;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Maximum width for any column.
const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Lines around the data rows: top border, header, separator, bottom border, footer.
const CHROME_LINES: usize = 5;

/// Widget for rendering a query result as a table.
pub struct ResultTable<'a> {
    result: &'a QueryResult,
    row_offset: usize,
    col_offset: usize,
}

impl<'a> ResultTable<'a> {
    pub fn new(result: &'a QueryResult) -> Self {
        Self {
            result,
            row_offset: 0,
            col_offset: 0,
        }
    }

    /// Scrolls the table to start at the given row and column.
    pub fn scroll(mut self, row: usize, col: usize) -> Self {
        self.row_offset = row;
        self.col_offset = col;
        self
    }

    fn visible_columns(&self) -> std::ops::Range<usize> {
        self.col_offset.min(self.result.columns.len())..self.result.columns.len()
    }

    /// Calculates the optimal width for each visible column.
    fn calculate_column_widths(&self) -> Vec<usize> {
        self.visible_columns()
            .map(|c| {
                let header = self.result.columns[c].width();
                (0..self.result.row_count())
                    .map(|r| self.result.cell(r, c).width())
                    .fold(header.max(MIN_COLUMN_WIDTH), usize::max)
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    /// Truncates a string to fit within the given width, adding ellipsis if needed.
    fn truncate(s: &str, max_width: usize) -> String {
        if s.width() <= max_width {
            s.to_string()
        } else if max_width <= 3 {
            take_width(s, max_width)
        } else {
            format!("{}...", take_width(s, max_width - 3))
        }
    }

    /// Pads `s` with spaces to `width` cells, surrounded by one space each side.
    fn cell_text(s: &str, width: usize) -> String {
        let padding = width.saturating_sub(s.width());
        format!(" {s}{} ", " ".repeat(padding))
    }

    /// Renders the table to a vector of Lines.
    ///
    /// `max_rows` bounds the number of data rows, starting at the row offset.
    pub fn render_to_lines(&self, available_width: usize, max_rows: usize) -> Vec<Line<'a>> {
        let mut lines = Vec::new();

        if self.result.is_empty() {
            lines.push(Line::from(Span::styled(
                "(no result set)",
                Style::default().fg(Color::DarkGray),
            )));
            return lines;
        }

        let widths = self.calculate_column_widths();

        // Shrink proportionally when the table is wider than the area.
        let total_width: usize = widths.iter().sum::<usize>() + widths.len() * 3 + 1;
        let scale_factor = if total_width > available_width && available_width > 0 {
            available_width as f64 / total_width as f64
        } else {
            1.0
        };
        let widths: Vec<usize> = widths
            .iter()
            .map(|&w| ((w as f64 * scale_factor) as usize).max(MIN_COLUMN_WIDTH))
            .collect();

        lines.push(self.render_border(&widths, '┌', '┬', '┐'));
        lines.push(self.render_header_row(&widths));
        lines.push(self.render_border(&widths, '├', '┼', '┤'));

        let first = self.row_offset.min(self.result.row_count());
        let last = first.saturating_add(max_rows).min(self.result.row_count());
        for row in first..last {
            lines.push(self.render_data_row(row, &widths));
        }

        lines.push(self.render_border(&widths, '└', '┴', '┘'));
        lines.push(Line::from(Span::styled(
            self.footer(first, last),
            Style::default().fg(Color::DarkGray),
        )));

        lines
    }

    fn footer(&self, first: usize, last: usize) -> String {
        let total = self.result.row_count();
        let mut footer = format!(
            "{} row{} ({}ms)",
            total,
            if total == 1 { "" } else { "s" },
            self.result.execution_time.as_millis()
        );
        if first > 0 || last < total {
            footer.push_str(&format!(", showing {}-{}", first + 1, last));
        }
        if self.col_offset > 0 {
            footer.push_str(&format!(", from column {}", self.col_offset + 1));
        }
        footer
    }

    fn render_border(&self, widths: &[usize], left: char, mid: char, right: char) -> Line<'a> {
        let mut border = String::new();
        border.push(left);

        for (i, &width) in widths.iter().enumerate() {
            border.push_str(&"─".repeat(width + 2));
            if i + 1 < widths.len() {
                border.push(mid);
            }
        }

        border.push(right);

        Line::from(Span::styled(border, Style::default().fg(Color::DarkGray)))
    }

    fn render_header_row(&self, widths: &[usize]) -> Line<'a> {
        let mut spans = vec![Span::styled("│", Style::default().fg(Color::DarkGray))];

        for (width, c) in widths.iter().zip(self.visible_columns()) {
            let name = Self::truncate(&self.result.columns[c], *width);
            spans.push(Span::styled(
                Self::cell_text(&name, *width),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }

        Line::from(spans)
    }

    fn render_data_row(&self, row: usize, widths: &[usize]) -> Line<'a> {
        let mut spans = vec![Span::styled("│", Style::default().fg(Color::DarkGray))];

        for (width, c) in widths.iter().zip(self.visible_columns()) {
            let value = Self::truncate(self.result.cell(row, c), *width);
            // The client prints SQL NULL as the literal text NULL.
            let style = if value == "NULL" {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };
            spans.push(Span::styled(Self::cell_text(&value, *width), style));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }

        Line::from(spans)
    }
}

/// Longest prefix of `s` that fits in `max_width` cells.
fn take_width(s: &str, max_width: usize) -> String {
    let mut used = 0;
    s.chars()
        .take_while(|ch| {
            used += ch.width().unwrap_or(0);
            used <= max_width
        })
        .collect()
}

/// Formats the whole result as plain text, for terminal output outside the TUI.
pub fn format_plain(result: &QueryResult) -> String {
    let table = ResultTable::new(result);
    let mut out = String::new();
    for line in table.render_to_lines(usize::MAX, usize::MAX) {
        for span in &line.spans {
            out.push_str(&span.content);
        }
        out.push('\n');
    }
    out
}

impl Widget for ResultTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let max_rows = (area.height as usize).saturating_sub(CHROME_LINES);
        let lines = self.render_to_lines(area.width as usize, max_rows);

        for (i, line) in lines.iter().enumerate().take(area.height as usize) {
            buf.set_line(area.x, area.y + i as u16, line, area.width);
        }
    }
}
