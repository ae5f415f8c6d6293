//! Connection form widget.

use crate::tui::app::FormField;
use crate::tui::text::InputState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Width of the label column, including the separator.
pub const LABEL_WIDTH: u16 = 11;

/// Connection form widget: one line per field.
pub struct ConnectionForm<'a> {
    fields: &'a [InputState; 5],
    focused: Option<FormField>,
}

impl<'a> ConnectionForm<'a> {
    pub fn new(fields: &'a [InputState; 5], focused: Option<FormField>) -> Self {
        Self { fields, focused }
    }

    /// Text shown for a field; the password is masked.
    pub fn display_value(field: FormField, input: &InputState) -> String {
        match field {
            FormField::Password => "*".repeat(input.text.chars().count()),
            _ => input.text.clone(),
        }
    }
}

impl Widget for ConnectionForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused.is_some() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Connection ");

        let lines: Vec<Line> = FormField::ALL
            .iter()
            .zip(self.fields.iter())
            .map(|(field, input)| {
                let label_style = if self.focused == Some(*field) {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Line::from(vec![
                    Span::styled(
                        format!("{:<width$}", format!("{}:", field.label()), width = LABEL_WIDTH as usize),
                        label_style,
                    ),
                    Span::raw(Self::display_value(*field, input)),
                ])
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_masked() {
        let input = InputState::with_text("s3cr3t");
        assert_eq!(ConnectionForm::display_value(FormField::Password, &input), "******");
        assert_eq!(ConnectionForm::display_value(FormField::Host, &input), "s3cr3t");
    }

    #[test]
    fn test_render_never_shows_password() {
        let fields = [
            InputState::with_text("db.local"),
            InputState::with_text("3306"),
            InputState::with_text("root"),
            InputState::with_text("hunter2"),
            InputState::with_text("shop"),
        ];
        let area = Rect::new(0, 0, 40, 7);
        let mut buf = Buffer::empty(area);
        ConnectionForm::new(&fields, Some(FormField::Password)).render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("db.local"));
        assert!(!text.contains("hunter2"));
    }
}
