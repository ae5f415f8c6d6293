//! Logging for mysql-client-tui.
//!
//! Records what was run against which server: the `user@host:port/db` target,
//! the executable and its arguments, exit codes, durations and timeouts.
//! Arguments only name the credentials file and targets come from
//! `ConnectionConfig::display_string`, so passwords never reach the log.
//!
//! The TUI logs to a file since the terminal is in raw mode; subcommands log
//! to stderr and keep stdout for results. `RUST_LOG` overrides the `info` level.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const APP_DIR: &str = "mysql-client-tui";
const LOG_FILE: &str = "mysql-client-tui.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes logging for TUI mode. Failing to open the log only warns.
///
/// Location: `~/.local/state/mysql-client-tui/mysql-client-tui.log` on Linux,
/// or the platform-appropriate state/config directory elsewhere.
pub fn init_file_logging() {
    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            return;
        }
    }

    // One session per file.
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(log_file)
        .with_ansi(false)
        .init();
}

/// Initializes logging for the subcommands; stdout stays reserved for results.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// Returns the path for the log file.
pub fn get_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join(APP_DIR).join(LOG_FILE);
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join(APP_DIR).join(LOG_FILE);
    }

    std::env::temp_dir().join(LOG_FILE)
}
