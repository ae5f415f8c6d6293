//! Test doubles for the runner.
//!
//! Used by the session and TUI tests so they never need a real client binary.

use super::{DatabaseCli, QueryResult};
use crate::config::ConnectionConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// A call received by [`MockDatabaseCli`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Query(String),
    TestConnection,
    Dump { output: PathBuf, tables: Vec<String> },
}

/// A runner that returns a canned result and records every call.
pub struct MockDatabaseCli {
    result: QueryResult,
    calls: Mutex<Vec<MockCall>>,
}

impl MockDatabaseCli {
    /// Creates a mock that answers every query with one `result` column.
    pub fn new() -> Self {
        Self::with_result(
            QueryResult::with_data(vec!["result".to_string()], vec![vec!["1".to_string()]])
                .with_execution_time(Duration::from_millis(1)),
        )
    }

    pub fn with_result(result: QueryResult) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns the calls received so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: MockCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Default for MockDatabaseCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseCli for MockDatabaseCli {
    async fn run_query(&self, _config: &ConnectionConfig, sql: &str) -> Result<QueryResult> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Ok(QueryResult::new());
        }
        self.record(MockCall::Query(sql.to_string()));
        Ok(self.result.clone())
    }

    async fn test_connection(&self, _config: &ConnectionConfig) -> Result<()> {
        self.record(MockCall::TestConnection);
        Ok(())
    }

    async fn dump_schema(
        &self,
        config: &ConnectionConfig,
        output: &Path,
        tables: &[String],
    ) -> Result<()> {
        if config.database().is_none() {
            return Err(AppError::validation("a database is required to export a dump"));
        }
        self.record(MockCall::Dump {
            output: output.to_path_buf(),
            tables: tables.to_vec(),
        });
        Ok(())
    }
}

/// A runner whose every invocation fails with `CommandFailed`.
pub struct FailingDatabaseCli {
    stderr: String,
}

impl FailingDatabaseCli {
    pub fn new(stderr: impl Into<String>) -> Self {
        Self {
            stderr: stderr.into(),
        }
    }

    fn error(&self, name: &str) -> AppError {
        AppError::command_failed(format!("{name} exited with status 1"), &self.stderr)
    }
}

#[async_trait]
impl DatabaseCli for FailingDatabaseCli {
    async fn run_query(&self, _config: &ConnectionConfig, _sql: &str) -> Result<QueryResult> {
        Err(self.error("mysql"))
    }

    async fn test_connection(&self, _config: &ConnectionConfig) -> Result<()> {
        Err(self.error("mysql"))
    }

    async fn dump_schema(
        &self,
        _config: &ConnectionConfig,
        _output: &Path,
        _tables: &[String],
    ) -> Result<()> {
        Err(self.error("mysqldump"))
    }
}
