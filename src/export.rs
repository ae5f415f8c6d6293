//! CSV export of the last query result.

use crate::error::{AppError, Result};
use crate::mysql::QueryResult;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes `result` as CSV: a header row, then one record per row.
///
/// Rows shorter than the header are padded with empty fields. Parent
/// directories are created as needed.
pub fn write_csv(path: &Path, result: &QueryResult) -> Result<()> {
    if result.is_empty() {
        return Err(AppError::validation(
            "no query result to export, run a query first",
        ));
    }
    if path.as_os_str().is_empty() {
        return Err(AppError::validation("path must not be empty"));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .flexible(false)
        .from_path(path)?;

    writer.write_record(&result.columns)?;
    for row in 0..result.row_count() {
        writer.write_record(result.padded_row(row))?;
    }
    writer.flush()?;

    info!(
        "Exported {} rows to {}",
        result.row_count(),
        path.display()
    );
    Ok(())
}

/// Expands a leading `~/` to the user's home directory.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
