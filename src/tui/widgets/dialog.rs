//! Modal dialogs: informational messages and single-line prompts.

use crate::tui::app::{Dialog, PromptKind};
use crate::tui::text::InputState;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Renders the active dialog centered over the frame.
pub fn render_dialog(frame: &mut Frame, dialog: &Dialog) {
    match dialog {
        Dialog::Message { title, body } => render_message(frame, title, body),
        Dialog::Prompt { kind, input } => render_prompt(frame, kind, input),
    }
}

fn render_message(frame: &mut Frame, title: &str, body: &str) {
    let area = frame.area();
    let width = dialog_width(area);
    let content_width = width.saturating_sub(4) as usize;
    let body_lines = wrap_text(body, content_width);
    // Body + spacing + hint + borders
    let height = (body_lines.len() as u16 + 4).min(area.height);
    let dialog_area = center_rect(width, height, area);

    let mut lines: Vec<Line> = body_lines.into_iter().map(Line::from).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            "[Enter/Esc]",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Close"),
    ]));

    let block = Block::default()
        .title(format!(" {title} "))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    frame.render_widget(Clear, dialog_area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        dialog_area,
    );
}

fn render_prompt(frame: &mut Frame, kind: &PromptKind, input: &InputState) {
    let area = frame.area();
    let width = dialog_width(area);
    let dialog_area = center_rect(width, 5.min(area.height), area);

    let label = kind.label();
    let inner_width = width.saturating_sub(2) as usize;
    let available = inner_width.saturating_sub(label.chars().count() + 1);
    let skip = input.cursor.saturating_sub(available);
    let visible: String = input.text.chars().skip(skip).take(available).collect();

    let lines = vec![
        Line::from(vec![
            Span::styled(label, Style::default().fg(Color::Cyan)),
            Span::raw(visible),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "[Enter]",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" OK  "),
            Span::styled(
                "[Esc]",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Cancel"),
        ]),
    ];

    let block = Block::default()
        .title(format!(" {} ", kind.title()))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    frame.render_widget(Clear, dialog_area);
    frame.render_widget(Paragraph::new(lines).block(block), dialog_area);

    let cursor_x = dialog_area.x + 1 + (label.chars().count() + input.cursor - skip) as u16;
    frame.set_cursor_position((cursor_x, dialog_area.y + 1));
}

fn dialog_width(area: Rect) -> u16 {
    ((area.width as f32 * 0.6) as u16).clamp(20.min(area.width), 80.min(area.width))
}

/// Wraps text on whitespace to fit within the given width.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for line in text.trim().lines() {
        let mut current = String::new();
        for word in line.split_whitespace() {
            let len = current.chars().count();
            if current.is_empty() {
                current = word.to_string();
            } else if len + 1 + word.chars().count() <= max_width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Centers a rectangle of the given size within the parent area.
fn center_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center);
    let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
