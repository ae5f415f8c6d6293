//! Presentation-layer session state.
//!
//! A [`Session`] owns everything the user has typed plus the single
//! "last result" slot, and turns each user action into one runner call.
//! Both the terminal UI and the command-line subcommands drive it.

use crate::config::{ConnectionConfig, ConnectionDefaults, ConnectionFields};
use crate::error::{AppError, Result};
use crate::export;
use crate::mysql::{DatabaseCli, QueryResult};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// What a completed action reports back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Text for the status line.
    pub status: String,
    /// Optional message shown in a dialog.
    pub message: Option<String>,
}

impl ActionOutcome {
    fn status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: None,
        }
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// User actions that trigger an external invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TestConnection,
    RunQuery,
    ExportCsv,
    ExportDump,
}

impl Action {
    /// Title used for dialogs and failure status lines.
    pub fn title(self) -> &'static str {
        match self {
            Self::TestConnection => "Test connection",
            Self::RunQuery => "Run query",
            Self::ExportCsv => "Export CSV",
            Self::ExportDump => "Export dump",
        }
    }

    /// Status line shown while the action is in flight.
    pub fn progress(self) -> &'static str {
        match self {
            Self::TestConnection => "Testing connection...",
            Self::RunQuery => "Running query...",
            Self::ExportCsv => "Exporting CSV...",
            Self::ExportDump => "Exporting dump...",
        }
    }

    /// Status line for a failed action.
    pub fn failure_status(self, error: &AppError) -> String {
        format!("{}: failed ({})", self.title(), error.category())
    }
}

/// Explicit state for one interactive session.
pub struct Session {
    cli: Arc<dyn DatabaseCli>,
    defaults: ConnectionDefaults,
    /// Connection form values.
    pub fields: ConnectionFields,
    /// SQL editor contents.
    pub sql: String,
    last_result: Option<QueryResult>,
}

impl Session {
    pub fn new(cli: Arc<dyn DatabaseCli>, defaults: ConnectionDefaults) -> Self {
        let fields = ConnectionFields::from_defaults(&defaults);
        Self {
            cli,
            defaults,
            fields,
            sql: String::new(),
            last_result: None,
        }
    }

    pub fn with_fields(mut self, fields: ConnectionFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = sql.into();
        self
    }

    /// Returns a handle to the runner, for use from a background task.
    pub fn cli(&self) -> Arc<dyn DatabaseCli> {
        Arc::clone(&self.cli)
    }

    /// Validates the form and builds a fresh connection config.
    pub fn build_config(&self) -> Result<ConnectionConfig> {
        self.fields.build(&self.defaults)
    }

    pub fn last_result(&self) -> Option<&QueryResult> {
        self.last_result.as_ref()
    }

    /// Stores a finished query as the last result.
    pub fn set_last_result(&mut self, result: QueryResult) {
        self.last_result = Some(result);
    }

    /// Returns true if there is a result with columns to export.
    pub fn has_exportable_result(&self) -> bool {
        self.last_result.as_ref().is_some_and(|r| !r.is_empty())
    }

    pub async fn test_connection(&self) -> Result<ActionOutcome> {
        let config = self.build_config()?;
        test_connection(self.cli.as_ref(), &config).await
    }

    /// Runs the editor SQL and replaces the last result on success.
    pub async fn run_query(&mut self) -> Result<ActionOutcome> {
        let config = self.build_config()?;
        let result = self.cli.run_query(&config, &self.sql).await?;
        let outcome = query_outcome(&result);
        self.set_last_result(result);
        Ok(outcome)
    }

    pub fn export_csv(&self, path: &Path) -> Result<ActionOutcome> {
        let result = self
            .last_result
            .as_ref()
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AppError::validation("no query result to export, run a query first"))?;

        export::write_csv(path, result)?;
        Ok(ActionOutcome::status(format!("Exported CSV: {}", path.display()))
            .with_message(format!("Saved {}", path.display())))
    }

    pub async fn export_dump(&self, path: &Path, tables: &[String]) -> Result<ActionOutcome> {
        let config = self.build_config()?;
        dump_schema(self.cli.as_ref(), &config, path, tables).await
    }
}

/// Runs the connectivity check.
pub async fn test_connection(
    cli: &dyn DatabaseCli,
    config: &ConnectionConfig,
) -> Result<ActionOutcome> {
    info!("Testing connection to {}", config.display_string());
    cli.test_connection(config).await.inspect_err(|e| {
        warn!("Connection test failed: {}", e.category());
    })?;
    Ok(ActionOutcome::status("Connection OK").with_message("Connected successfully"))
}

/// Runs a dump into `path`.
pub async fn dump_schema(
    cli: &dyn DatabaseCli,
    config: &ConnectionConfig,
    path: &Path,
    tables: &[String],
) -> Result<ActionOutcome> {
    cli.dump_schema(config, path, tables).await?;
    Ok(ActionOutcome::status(format!("Exported dump: {}", path.display()))
        .with_message(format!("Saved {}", path.display())))
}

/// Status line for a finished query.
pub fn query_outcome(result: &QueryResult) -> ActionOutcome {
    if result.is_empty() {
        return ActionOutcome::status("Done: no result set");
    }
    let rows = result.row_count();
    ActionOutcome::status(format!(
        "Done: {} row{} ({}ms)",
        rows,
        if rows == 1 { "" } else { "s" },
        result.execution_time.as_millis()
    ))
}

/// Splits a space- or comma-separated table list.
pub fn parse_table_list(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
