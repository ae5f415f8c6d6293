//! Transient `--defaults-extra-file` holding the connection credentials.
//!
//! Secrets never go on the command line, where any user can read them from
//! the process list. Each invocation writes a `[client]` option file into the
//! temp directory, readable by the owner only, and the [`DefaultsFile`] guard
//! removes it when dropped: after success, after an error propagated with
//! `?`, after a timeout cancels the child, and during unwinding.

use crate::config::ConnectionConfig;
use crate::error::{AppError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

const FILE_PREFIX: &str = "mysql-client-tui-";
const FILE_SUFFIX: &str = ".cnf";

/// Scoped credentials file. Deleted on drop.
#[derive(Debug)]
pub struct DefaultsFile {
    file: NamedTempFile,
}

impl DefaultsFile {
    /// Writes the option file for `config` and restricts it to mode `0600`.
    pub fn create(config: &ConnectionConfig) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(FILE_PREFIX)
            .suffix(FILE_SUFFIX)
            .tempfile()
            .map_err(|e| AppError::io(format!("Failed to create credentials file: {e}")))?;

        restrict_permissions(file.path())?;

        file.write_all(render(config).as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| AppError::io(format!("Failed to write credentials file: {e}")))?;

        debug!("Wrote credentials file {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| AppError::io(format!("Failed to restrict credentials file: {e}")))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// Renders the `[client]` section. Empty user, password and database are omitted.
pub fn render(config: &ConnectionConfig) -> String {
    let mut lines = vec!["[client]".to_string()];

    lines.push(format!("host={}", option_value(config.host())));
    lines.push(format!("port={}", config.port()));
    if !config.user().is_empty() {
        lines.push(format!("user={}", option_value(config.user())));
    }
    if !config.password().is_empty() {
        lines.push(format!("password={}", option_value(config.password())));
    }
    if let Some(db) = config.database() {
        lines.push(format!("database={}", option_value(db)));
    }
    lines.push(format!(
        "default-character-set={}",
        option_value(config.charset())
    ));

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Escapes a value for a MySQL option file.
///
/// Backslash escapes cover the control characters the option parser knows.
/// Values that would otherwise lose characters (`#` starts a comment, outer
/// whitespace is trimmed, one outer pair of quotes is stripped) are wrapped
/// in double quotes; the parser only strips the outermost pair.
fn option_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\u{8}' => escaped.push_str("\\b"),
            _ => escaped.push(c),
        }
    }

    let needs_quotes = escaped.contains('#')
        || escaped.starts_with(['"', '\''])
        || escaped.ends_with(['"', '\''])
        || escaped.starts_with(char::is_whitespace)
        || escaped.ends_with(char::is_whitespace);

    if needs_quotes {
        format!("\"{escaped}\"")
    } else {
        escaped
    }
}
