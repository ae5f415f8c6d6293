//! External process execution with a bounded wait.
//!
//! Children are spawned with `kill_on_drop`, so when the timeout fires and
//! the wait future is dropped the process is killed instead of left running.

use crate::error::{AppError, Result};
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Resolves an executable name (or path) against `PATH`.
pub fn locate(executable: &str) -> Result<PathBuf> {
    which::which(executable).map_err(|e| {
        debug!("Failed to resolve {}: {}", executable, e);
        AppError::executable_not_found(executable)
    })
}

/// One external process invocation. Never persisted.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Short name used in messages (`mysql`, `mysqldump`).
    pub name: String,
    /// Resolved executable path.
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub timeout: Duration,
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl ProcessOutput {
    fn from_output(output: Output, elapsed: Duration) -> Self {
        Self {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed,
        }
    }

    /// Maps a non-zero exit into `CommandFailed` with the captured stderr.
    pub fn ensure_success(self, name: &str) -> Result<Self> {
        if self.success {
            return Ok(self);
        }

        let message = match self.exit_code {
            Some(code) => format!("{name} exited with status {code}"),
            None => format!("{name} was terminated by a signal"),
        };
        Err(AppError::command_failed(message, self.stderr.trim()))
    }
}

impl Invocation {
    /// Runs the process, capturing stdout and stderr.
    pub async fn run_captured(&self) -> Result<ProcessOutput> {
        let mut command = self.command();
        command.stdout(Stdio::piped());
        self.wait(command).await
    }

    /// Runs the process with stdout written straight into `output`.
    pub async fn run_to_file(&self, output: &Path) -> Result<ProcessOutput> {
        let file = File::create(output).map_err(|e| {
            AppError::io(format!("Failed to create {}: {e}", output.display()))
        })?;

        let mut command = self.command();
        command.stdout(Stdio::from(file));
        self.wait(command).await
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    async fn wait(&self, mut command: Command) -> Result<ProcessOutput> {
        // Argument lists only reference the credentials file, never secrets.
        debug!("Running {} {:?}", self.program.display(), self.args);

        let start = Instant::now();
        let child = command
            .spawn()
            .map_err(|e| AppError::io(format!("Failed to run {}: {e}", self.name)))?;

        match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let output = ProcessOutput::from_output(output, start.elapsed());
                debug!(
                    "{} finished with {:?} in {}ms",
                    self.name,
                    output.exit_code,
                    output.elapsed.as_millis()
                );
                Ok(output)
            }
            Ok(Err(e)) => Err(AppError::io(format!(
                "Failed to wait for {}: {e}",
                self.name
            ))),
            Err(_) => {
                let seconds = whole_seconds(self.timeout);
                warn!("{} exceeded {}s, killing it", self.name, seconds);
                Err(AppError::timeout(&self.name, seconds))
            }
        }
    }
}

/// Rounds up, so a sub-second timeout never reads as `0s`.
fn whole_seconds(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}
