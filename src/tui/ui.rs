//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components.

use super::app::{App, Focus, FormField};
use super::widgets::{dialog, editor, form, header, table};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const HELP_TEXT: &str =
    " Tab focus | F5/Ctrl+R run | F2 test | F3 CSV | F4 dump | Ctrl+L clear SQL | Ctrl+Q quit";

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(7), // Form + editor
            Constraint::Min(3),    // Results
            Constraint::Length(1), // Help
            Constraint::Length(1), // Status
        ])
        .split(area);

    let top_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(40), Constraint::Min(20)])
        .split(main_layout[1]);

    render_header(frame, main_layout[0], app);
    render_form(frame, top_layout[0], app);
    render_editor(frame, top_layout[1], app);
    render_results(frame, main_layout[2], app);
    frame.render_widget(
        Paragraph::new(HELP_TEXT).style(Style::default().fg(Color::DarkGray)),
        main_layout[3],
    );
    render_status(frame, main_layout[4], app);

    if let Some(active) = &app.dialog {
        dialog::render_dialog(frame, active);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let info = app.connection_info();
    let widget = header::Header::new(info.as_deref(), app.spinner.as_ref());
    frame.render_widget(widget, area);
}

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let focused = match app.focus {
        Focus::Field(field) => Some(field),
        _ => None,
    };
    frame.render_widget(form::ConnectionForm::new(&app.fields, focused), area);

    if let (Some(field), None) = (focused, &app.dialog) {
        let row = FormField::ALL.iter().position(|f| *f == field).unwrap_or(0) as u16;
        let input = app.field(field);
        let x = area.x + 1 + form::LABEL_WIDTH + input.cursor as u16;
        let max_x = area.right().saturating_sub(2);
        frame.set_cursor_position((x.min(max_x), area.y + 1 + row));
    }
}

fn render_editor(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Editor;
    frame.render_widget(editor::SqlEditor::new(&app.editor, focused), area);

    if focused && app.dialog.is_none() {
        let inner = editor::SqlEditor::block(true).inner(area);
        let (row_offset, col_offset) = editor::scroll_offsets(&app.editor, inner);
        let x = inner.x + (app.editor.col - col_offset) as u16;
        let y = inner.y + (app.editor.row - row_offset) as u16;
        frame.set_cursor_position((x, y));
    }
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let border_style = if app.focus == Focus::Results {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Results ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match app.last_result() {
        Some(result) => frame.render_widget(
            table::ResultTable::new(result).scroll(app.results_scroll, app.results_col),
            inner,
        ),
        None => frame.render_widget(
            Paragraph::new("Run a query to see results here.")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        ),
    }
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let style = if app.status.contains(": failed") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!(" {}", app.status), style))),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionDefaults;
    use crate::mysql::{MockDatabaseCli, QueryResult};
    use crate::session::Session;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_render_initial_screen() {
        let app = App::new(Session::new(
            Arc::new(MockDatabaseCli::new()),
            ConnectionDefaults::default(),
        ));
        let text = screen(&app);
        assert!(text.contains("Connection"));
        assert!(text.contains("SELECT 1;"));
        assert!(text.contains("Run a query"));
        assert!(text.contains("Ready"));
    }

    #[test]
    fn test_render_results() {
        let mut app = App::new(Session::new(
            Arc::new(MockDatabaseCli::new()),
            ConnectionDefaults::default(),
        ));
        app.session.set_last_result(QueryResult::with_data(
            vec!["city".into()],
            vec![vec!["Berlin".into()]],
        ));
        let text = screen(&app);
        assert!(text.contains("city"));
        assert!(text.contains("Berlin"));
    }
}
