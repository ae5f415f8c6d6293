//! Error types for mysql-client-tui.
//!
//! Every failure the runner or the presentation layer can produce maps onto
//! one of the five variants below. Errors are surfaced to the user at the
//! boundary (dialog + status line, or the CLI exit path) and never retried.

use thiserror::Error;

/// Main error type for mysql-client-tui operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad user input: empty host/user, port out of range, missing database for a dump.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The required client binary is not on the search path.
    #[error("Executable not found: {executable} (install the MySQL command-line client and make sure it is on PATH)")]
    ExecutableNotFound { executable: String },

    /// The external process exited with a non-zero status.
    #[error("{message}: {stderr}")]
    CommandFailed { message: String, stderr: String },

    /// The external process exceeded its allotted duration.
    #[error("Timed out after {seconds}s waiting for {program}")]
    Timeout { program: String, seconds: u64 },

    /// Temp-file, output-file or spawn failures.
    #[error("I/O error: {0}")]
    Io(String),
}

impl AppError {
    /// Creates a validation error with the given message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates an executable-not-found error for the given program.
    pub fn executable_not_found(executable: impl Into<String>) -> Self {
        Self::ExecutableNotFound {
            executable: executable.into(),
        }
    }

    /// Creates a command-failed error carrying the captured stderr.
    pub fn command_failed(message: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
            message: message.into(),
            stderr: stderr.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(program: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            program: program.into(),
            seconds,
        }
    }

    /// Creates an I/O error with the given message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation Error",
            Self::ExecutableNotFound { .. } => "Executable Not Found",
            Self::CommandFailed { .. } => "Command Failed",
            Self::Timeout { .. } => "Timeout",
            Self::Io(_) => "I/O Error",
        }
    }

    /// Returns the captured stderr for `CommandFailed`.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_validation() {
        let err = AppError::validation("host must not be empty");
        assert_eq!(err.to_string(), "Validation error: host must not be empty");
        assert_eq!(err.category(), "Validation Error");
    }

    #[test]
    fn test_error_display_executable_not_found() {
        let err = AppError::executable_not_found("mysqldump");
        assert!(err.to_string().starts_with("Executable not found: mysqldump"));
        assert_eq!(err.category(), "Executable Not Found");
    }

    #[test]
    fn test_error_display_command_failed() {
        let err = AppError::command_failed(
            "mysql failed",
            "ERROR 1045 (28000): Access denied for user 'root'@'localhost'",
        );
        assert_eq!(
            err.to_string(),
            "mysql failed: ERROR 1045 (28000): Access denied for user 'root'@'localhost'"
        );
        assert_eq!(
            err.stderr(),
            Some("ERROR 1045 (28000): Access denied for user 'root'@'localhost'")
        );
        assert_eq!(err.category(), "Command Failed");
    }

    #[test]
    fn test_error_display_timeout() {
        let err = AppError::timeout("mysql", 60);
        assert_eq!(err.to_string(), "Timed out after 60s waiting for mysql");
        assert_eq!(err.category(), "Timeout");
        assert!(err.stderr().is_none());
    }

    #[test]
    fn test_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(err.category(), "I/O Error");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppError>();
    }
}
