//! Argument builders for the `mysql` and `mysqldump` invocations.
//!
//! These functions are pure: they never touch the file system or spawn
//! anything, and the argument lists they produce never contain credentials.

use crate::config::ConnectionConfig;
use std::ffi::OsString;
use std::path::Path;

fn defaults_arg(defaults_file: &Path) -> OsString {
    let mut arg = OsString::from("--defaults-extra-file=");
    arg.push(defaults_file);
    arg
}

/// Arguments for a batch query: tab-separated, unescaped, with a header line.
pub fn query_args(config: &ConnectionConfig, defaults_file: &Path, sql: &str) -> Vec<OsString> {
    vec![
        defaults_arg(defaults_file),
        "--protocol=tcp".into(),
        format!("--connect-timeout={}", config.connect_timeout().as_secs()).into(),
        "--batch".into(),
        "--raw".into(),
        "--silent".into(),
        "--column-names".into(),
        format!("--execute={sql}").into(),
    ]
}

/// Arguments for a consistent dump of `database`, optionally limited to `tables`.
pub fn dump_args(defaults_file: &Path, database: &str, tables: &[String]) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        defaults_arg(defaults_file),
        "--protocol=tcp".into(),
        "--single-transaction".into(),
        "--quick".into(),
        "--routines".into(),
        "--events".into(),
        database.into(),
    ];
    args.extend(tables.iter().map(OsString::from));
    args
}
