//! Command builder and process runner for the MySQL command-line tools.
//!
//! Turns a [`ConnectionConfig`] plus a SQL string into a `mysql` invocation
//! (or a `mysqldump` invocation), runs it with a timeout and maps the outcome
//! onto [`AppError`](crate::error::AppError).

pub mod command;
pub mod defaults_file;
mod mock;
pub mod parse;
pub mod process;
mod types;

pub use defaults_file::DefaultsFile;
pub use mock::{FailingDatabaseCli, MockCall, MockDatabaseCli};
pub use parse::{parse_batch_output, parse_query_result};
pub use process::{Invocation, ProcessOutput};
pub use types::QueryResult;

use crate::config::{ConnectionConfig, ToolsConfig};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Statement used to check connectivity.
pub const TEST_CONNECTION_SQL: &str = "SELECT 1;";

/// Interface of the runner as seen by the presentation layer.
#[async_trait]
pub trait DatabaseCli: Send + Sync {
    /// Runs one SQL string and parses the tab-separated output.
    async fn run_query(&self, config: &ConnectionConfig, sql: &str) -> Result<QueryResult>;

    /// Runs a trivial query with a short timeout.
    async fn test_connection(&self, config: &ConnectionConfig) -> Result<()>;

    /// Dumps the configured database (optionally only `tables`) into `output`.
    async fn dump_schema(
        &self,
        config: &ConnectionConfig,
        output: &Path,
        tables: &[String],
    ) -> Result<()>;
}

/// Runner backed by the real `mysql` and `mysqldump` executables.
#[derive(Debug, Clone)]
pub struct MysqlCli {
    mysql: String,
    mysqldump: String,
    query_timeout: Duration,
    test_timeout: Duration,
    dump_timeout: Duration,
}

impl Default for MysqlCli {
    fn default() -> Self {
        Self::new(&ToolsConfig::default())
    }
}

impl MysqlCli {
    pub fn new(tools: &ToolsConfig) -> Self {
        Self {
            mysql: tools.mysql.clone(),
            mysqldump: tools.mysqldump.clone(),
            query_timeout: tools.query_timeout(),
            test_timeout: tools.test_timeout(),
            dump_timeout: tools.dump_timeout(),
        }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn with_dump_timeout(mut self, timeout: Duration) -> Self {
        self.dump_timeout = timeout;
        self
    }

    /// Runs `sql` through the client with an explicit timeout.
    pub async fn query_with_timeout(
        &self,
        config: &ConnectionConfig,
        sql: &str,
        timeout: Duration,
    ) -> Result<QueryResult> {
        let program = process::locate(&self.mysql)?;

        let sql = sql.trim();
        if sql.is_empty() {
            return Ok(QueryResult::new());
        }

        info!("Running query against {}", config.display_string());

        let output = {
            let defaults = DefaultsFile::create(config)?;
            let invocation = Invocation {
                name: "mysql".to_string(),
                program,
                args: command::query_args(config, defaults.path(), sql),
                timeout,
            };
            invocation.run_captured().await
        }?
        .ensure_success("mysql")?;

        let result = parse_query_result(&output.stdout).with_execution_time(output.elapsed);
        info!(
            "Query returned {} rows in {}ms",
            result.row_count(),
            result.execution_time.as_millis()
        );
        Ok(result)
    }
}

#[async_trait]
impl DatabaseCli for MysqlCli {
    async fn run_query(&self, config: &ConnectionConfig, sql: &str) -> Result<QueryResult> {
        self.query_with_timeout(config, sql, self.query_timeout)
            .await
    }

    async fn test_connection(&self, config: &ConnectionConfig) -> Result<()> {
        self.query_with_timeout(config, TEST_CONNECTION_SQL, self.test_timeout)
            .await
            .map(|_| ())
    }

    async fn dump_schema(
        &self,
        config: &ConnectionConfig,
        output: &Path,
        tables: &[String],
    ) -> Result<()> {
        let database = config
            .database()
            .ok_or_else(|| AppError::validation("a database is required to export a dump"))?;

        let program = process::locate(&self.mysqldump)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::io(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }

        info!(
            "Dumping {} ({} tables) to {}",
            database,
            if tables.is_empty() {
                "all".to_string()
            } else {
                tables.len().to_string()
            },
            output.display()
        );

        let finished = {
            let defaults = DefaultsFile::create(config)?;
            let invocation = Invocation {
                name: "mysqldump".to_string(),
                program,
                args: command::dump_args(defaults.path(), database, tables),
                timeout: self.dump_timeout,
            };
            invocation.run_to_file(output).await
        }?
        .ensure_success("mysqldump")?;

        info!("Dump finished in {}ms", finished.elapsed.as_millis());
        Ok(())
    }
}
