//! Header widget for the TUI.
//!
//! Displays the application name, version, the activity spinner and the
//! connection the form currently describes.

use super::spinner::Spinner;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// Header bar widget.
pub struct Header<'a> {
    connection_info: Option<&'a str>,
    spinner: Option<&'a Spinner>,
}

impl<'a> Header<'a> {
    pub fn new(connection_info: Option<&'a str>, spinner: Option<&'a Spinner>) -> Self {
        Self {
            connection_info,
            spinner,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left_text = format!(" MySQL Client v{}", env!("CARGO_PKG_VERSION"));
        buf.set_span(area.x, area.y, &Span::styled(left_text, style), area.width);

        if let Some(spinner) = self.spinner {
            let text = spinner.display();
            let spinner_style = style.fg(Color::Yellow);
            let width = text.chars().count() as u16;
            let x = area.x + area.width.saturating_sub(width) / 2;
            buf.set_string(x, area.y, &text, spinner_style);
        }

        // Right side: what the form points at, or a hint when it is invalid.
        let (right_text, right_style) = match self.connection_info {
            Some(info) => (format!(" [{}] ", info), style),
            None => (" [incomplete connection] ".to_string(), style.fg(Color::Gray)),
        };
        let width = right_text.chars().count() as u16;
        if width < area.width {
            let x = area.right().saturating_sub(width);
            buf.set_string(x, area.y, &right_text, right_style);
        }
    }
}
