//! Application state for the TUI.
//!
//! Contains the main App struct and related types for managing UI state.
//! Key handling is pure state manipulation; anything that needs the external
//! tools comes back out of [`App::handle_key`] as a [`Request`] for the
//! event loop to run on a background task.

use super::text::{InputState, TextEditor};
use super::widgets::spinner::Spinner;
use crate::config::{ConnectionConfig, ConnectionFields};
use crate::error::{AppError, Result};
use crate::export::expand_path;
use crate::mysql::{DatabaseCli, QueryResult};
use crate::session::{self, Action, ActionOutcome, Session};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error};

/// Default file offered by the CSV export prompt.
pub const DEFAULT_CSV_PATH: &str = "./result.csv";

/// Default file offered by the dump export prompt.
pub const DEFAULT_DUMP_PATH: &str = "./dump.sql";

/// Initial SQL editor contents.
pub const INITIAL_SQL: &str = "SELECT 1;";

/// Connection form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Host,
    Port,
    User,
    Password,
    Database,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        Self::Host,
        Self::Port,
        Self::User,
        Self::Password,
        Self::Database,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Host => "Host",
            Self::Port => "Port",
            Self::User => "User",
            Self::Password => "Password",
            Self::Database => "Database",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Which panel currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FormField),
    Editor,
    Results,
}

impl Default for Focus {
    fn default() -> Self {
        Self::Editor
    }
}

impl Focus {
    /// Cycles to the next focus target.
    pub fn next(self) -> Self {
        match self {
            Self::Field(FormField::Database) => Self::Editor,
            Self::Field(f) => Self::Field(FormField::ALL[f.index() + 1]),
            Self::Editor => Self::Results,
            Self::Results => Self::Field(FormField::Host),
        }
    }

    /// Cycles to the previous focus target.
    pub fn prev(self) -> Self {
        match self {
            Self::Field(FormField::Host) => Self::Results,
            Self::Field(f) => Self::Field(FormField::ALL[f.index() - 1]),
            Self::Editor => Self::Field(FormField::Database),
            Self::Results => Self::Editor,
        }
    }
}

/// What a prompt dialog is asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    CsvPath,
    DumpPath,
    /// Second step of a dump export; the path is already chosen.
    DumpTables { path: PathBuf },
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::CsvPath => "Export CSV",
            Self::DumpPath | Self::DumpTables { .. } => "Export dump",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CsvPath | Self::DumpPath => "Save to: ",
            Self::DumpTables { .. } => "Tables (blank = all): ",
        }
    }
}

/// Modal dialog state.
#[derive(Debug, Clone)]
pub enum Dialog {
    Message { title: String, body: String },
    Prompt { kind: PromptKind, input: InputState },
}

/// Work that needs the external tools.
#[derive(Debug, Clone)]
pub enum Request {
    TestConnection(ConnectionConfig),
    RunQuery { config: ConnectionConfig, sql: String },
    ExportDump {
        config: ConnectionConfig,
        path: PathBuf,
        tables: Vec<String>,
    },
}

impl Request {
    pub fn action(&self) -> Action {
        match self {
            Self::TestConnection(_) => Action::TestConnection,
            Self::RunQuery { .. } => Action::RunQuery,
            Self::ExportDump { .. } => Action::ExportDump,
        }
    }

    /// Runs the request against the runner.
    pub async fn execute(self, cli: Arc<dyn DatabaseCli>) -> TaskResult {
        match self {
            Self::TestConnection(config) => {
                TaskResult::Connection(session::test_connection(cli.as_ref(), &config).await)
            }
            Self::RunQuery { config, sql } => {
                TaskResult::Query(cli.run_query(&config, &sql).await)
            }
            Self::ExportDump {
                config,
                path,
                tables,
            } => TaskResult::Dump(session::dump_schema(cli.as_ref(), &config, &path, &tables).await),
        }
    }
}

/// Outcome of a background request.
#[derive(Debug)]
pub enum TaskResult {
    Connection(Result<ActionOutcome>),
    Query(Result<QueryResult>),
    Dump(Result<ActionOutcome>),
}

impl TaskResult {
    fn action(&self) -> Action {
        match self {
            Self::Connection(_) => Action::TestConnection,
            Self::Query(_) => Action::RunQuery,
            Self::Dump(_) => Action::ExportDump,
        }
    }
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    pub focus: Focus,
    pub session: Session,
    /// One input per [`FormField`], in the same order.
    pub fields: [InputState; 5],
    pub editor: TextEditor,
    /// First visible result row.
    pub results_scroll: usize,
    /// First visible result column.
    pub results_col: usize,
    pub status: String,
    pub dialog: Option<Dialog>,
    /// Action currently running in the background, if any.
    pub busy: Option<Action>,
    pub spinner: Option<Spinner>,
}

impl App {
    /// Creates a new App instance.
    pub fn new(session: Session) -> Self {
        let f = &session.fields;
        let fields = [
            InputState::with_text(f.host.clone()),
            InputState::with_text(f.port.clone()),
            InputState::with_text(f.user.clone()),
            InputState::with_text(f.password.clone()),
            InputState::with_text(f.database.clone()),
        ];
        let sql = if session.sql.trim().is_empty() {
            INITIAL_SQL.to_string()
        } else {
            session.sql.clone()
        };

        Self {
            running: true,
            focus: Focus::default(),
            session,
            fields,
            editor: TextEditor::with_text(&sql),
            results_scroll: 0,
            results_col: 0,
            status: "Ready".to_string(),
            dialog: None,
            busy: None,
            spinner: None,
        }
    }

    pub fn field(&self, field: FormField) -> &InputState {
        &self.fields[field.index()]
    }

    /// Copies the form and editor into the session.
    fn sync_session(&mut self) {
        let [host, port, user, password, database] = &self.fields;
        self.session.fields = ConnectionFields {
            host: host.text.clone(),
            port: port.text.clone(),
            user: user.text.clone(),
            password: password.text.clone(),
            database: database.text.clone(),
        };
        self.session.sql = self.editor.text();
    }

    /// Display string for the header, if the form currently validates.
    pub fn connection_info(&self) -> Option<String> {
        let [host, port, user, _, database] = &self.fields;
        let port = crate::config::parse_port(&port.text).ok()?;
        ConnectionConfig::new(&host.text, port, &user.text, "", Some(&database.text))
            .ok()
            .map(|c| c.display_string())
    }

    pub fn last_result(&self) -> Option<&QueryResult> {
        self.session.last_result()
    }

    pub fn show_message(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.dialog = Some(Dialog::Message {
            title: title.into(),
            body: body.into(),
        });
    }

    fn show_error(&mut self, action: Action, err: &AppError) {
        error!("{} failed: {}", action.title(), err);
        self.status = action.failure_status(err);
        self.show_message(action.title(), err.to_string());
    }

    fn open_prompt(&mut self, kind: PromptKind, default: &str) {
        self.dialog = Some(Dialog::Prompt {
            kind,
            input: InputState::with_text(default),
        });
    }

    /// Handles a key press. Returns work for the background runner, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Request> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.running = false;
            return None;
        }

        if self.dialog.is_some() {
            return self.handle_dialog_key(key);
        }

        match key.code {
            KeyCode::F(2) => return self.begin(Action::TestConnection),
            KeyCode::F(3) => return self.begin(Action::ExportCsv),
            KeyCode::F(4) => return self.begin(Action::ExportDump),
            KeyCode::F(5) => return self.begin(Action::RunQuery),
            KeyCode::Char('r') if ctrl => return self.begin(Action::RunQuery),
            KeyCode::Enter if ctrl || key.modifiers.contains(KeyModifiers::ALT) => {
                return self.begin(Action::RunQuery)
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return None;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Field(field) => self.handle_field_key(field, key),
            Focus::Editor => self.handle_editor_key(key),
            Focus::Results => self.handle_results_key(key),
        }
        None
    }

    /// Starts an action: validates input and either finishes it in place
    /// (CSV export, prompts) or returns a request for the runner.
    pub fn begin(&mut self, action: Action) -> Option<Request> {
        if let Some(running) = self.busy {
            self.status = format!("Busy: {} is still running", running.title().to_lowercase());
            return None;
        }

        self.sync_session();
        match action {
            Action::ExportCsv => {
                if !self.session.has_exportable_result() {
                    self.show_message(
                        action.title(),
                        "No query result to export, run a query first.",
                    );
                    return None;
                }
                self.open_prompt(PromptKind::CsvPath, DEFAULT_CSV_PATH);
                None
            }
            Action::ExportDump => {
                let config = self.config_or_report(action)?;
                if config.database().is_none() {
                    let err = AppError::validation("a database is required to export a dump");
                    self.show_error(action, &err);
                    return None;
                }
                self.open_prompt(PromptKind::DumpPath, DEFAULT_DUMP_PATH);
                None
            }
            Action::TestConnection => {
                let config = self.config_or_report(action)?;
                Some(self.dispatch(Request::TestConnection(config)))
            }
            Action::RunQuery => {
                let config = self.config_or_report(action)?;
                let sql = self.session.sql.clone();
                Some(self.dispatch(Request::RunQuery { config, sql }))
            }
        }
    }

    fn config_or_report(&mut self, action: Action) -> Option<ConnectionConfig> {
        match self.session.build_config() {
            Ok(config) => Some(config),
            Err(e) => {
                self.show_error(action, &e);
                None
            }
        }
    }

    /// Marks the request as in flight.
    fn dispatch(&mut self, request: Request) -> Request {
        let action = request.action();
        debug!("Dispatching {:?}", action);
        self.busy = Some(action);
        self.status = action.progress().to_string();
        self.spinner = Some(Spinner::new(action.progress().trim_end_matches('.')));
        request
    }

    /// Applies the result of a finished background request.
    pub fn finish(&mut self, result: TaskResult) {
        let action = result.action();
        self.busy = None;
        self.spinner = None;

        match result {
            TaskResult::Query(Ok(query)) => {
                self.status = session::query_outcome(&query).status;
                self.results_scroll = 0;
                self.results_col = 0;
                self.session.set_last_result(query);
            }
            TaskResult::Connection(Ok(outcome)) | TaskResult::Dump(Ok(outcome)) => {
                self.status = outcome.status;
                if let Some(message) = outcome.message {
                    self.show_message(action.title(), message);
                }
            }
            TaskResult::Query(Err(e))
            | TaskResult::Connection(Err(e))
            | TaskResult::Dump(Err(e)) => self.show_error(action, &e),
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) -> Option<Request> {
        let Some(dialog) = self.dialog.as_mut() else {
            return None;
        };

        match dialog {
            Dialog::Message { .. } => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.dialog = None;
                }
                None
            }
            Dialog::Prompt { input, .. } => match key.code {
                KeyCode::Esc => {
                    self.dialog = None;
                    self.status = "Cancelled".to_string();
                    None
                }
                KeyCode::Enter => {
                    let Some(Dialog::Prompt { kind, input }) = self.dialog.take() else {
                        return None;
                    };
                    self.submit_prompt(kind, input.text)
                }
                _ => {
                    edit_input(input, key);
                    None
                }
            },
        }
    }

    fn submit_prompt(&mut self, kind: PromptKind, text: String) -> Option<Request> {
        match kind {
            PromptKind::CsvPath | PromptKind::DumpPath if text.trim().is_empty() => {
                self.show_message(kind.title(), "Path must not be empty.");
                None
            }
            PromptKind::CsvPath => {
                let path = expand_path(&text);
                match self.session.export_csv(&path) {
                    Ok(outcome) => {
                        self.status = outcome.status;
                        if let Some(message) = outcome.message {
                            self.show_message(kind.title(), message);
                        }
                    }
                    Err(e) => self.show_error(Action::ExportCsv, &e),
                }
                None
            }
            PromptKind::DumpPath => {
                let path = expand_path(&text);
                self.open_prompt(PromptKind::DumpTables { path }, "");
                None
            }
            PromptKind::DumpTables { path } => {
                if let Some(running) = self.busy {
                    self.status =
                        format!("Busy: {} is still running", running.title().to_lowercase());
                    return None;
                }
                let config = self.config_or_report(Action::ExportDump)?;
                let tables = session::parse_table_list(&text);
                Some(self.dispatch(Request::ExportDump {
                    config,
                    path,
                    tables,
                }))
            }
        }
    }

    fn handle_field_key(&mut self, field: FormField, key: KeyEvent) {
        if key.code == KeyCode::Enter {
            self.focus = self.focus.next();
            return;
        }
        edit_input(&mut self.fields[field.index()], key);
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('l') if ctrl => self.editor.clear(),
            KeyCode::Char(c) if !ctrl => self.editor.insert(c),
            KeyCode::Enter => self.editor.newline(),
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete(),
            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Up => self.editor.move_up(),
            KeyCode::Down => self.editor.move_down(),
            KeyCode::Home => self.editor.move_home(),
            KeyCode::End => self.editor.move_end(),
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        let (rows, cols) = self
            .last_result()
            .map(|r| (r.row_count(), r.columns.len()))
            .unwrap_or((0, 0));
        let max_row = rows.saturating_sub(1);
        let max_col = cols.saturating_sub(1);

        match key.code {
            KeyCode::Up => self.results_scroll = self.results_scroll.saturating_sub(1),
            KeyCode::Down => self.results_scroll = (self.results_scroll + 1).min(max_row),
            KeyCode::PageUp => self.results_scroll = self.results_scroll.saturating_sub(10),
            KeyCode::PageDown => self.results_scroll = (self.results_scroll + 10).min(max_row),
            KeyCode::Home => self.results_scroll = 0,
            KeyCode::End => self.results_scroll = max_row,
            KeyCode::Left => self.results_col = self.results_col.saturating_sub(1),
            KeyCode::Right => self.results_col = (self.results_col + 1).min(max_col),
            _ => {}
        }
    }
}

/// Applies a line-editing key to a single-line input.
fn edit_input(input: &mut InputState, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('w') if ctrl => input.delete_word(),
        KeyCode::Char(c) if !ctrl => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => {}
    }
}
