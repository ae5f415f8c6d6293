//! Dump integration tests against a fake `mysqldump`.

use super::common::{config, FakeTools};
use mysql_client_tui::error::AppError;
use mysql_client_tui::mysql::DatabaseCli;
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_dump_writes_stdout_to_file() {
    let tools = FakeTools::new();
    tools.mysqldump("echo '-- MySQL dump'\necho 'CREATE TABLE users (id int);'");
    let output = tools.dir.path().join("out").join("dump.sql");

    tools
        .runner()
        .dump_schema(&config(Some("shop")), &output, &["users".to_string()])
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "-- MySQL dump\nCREATE TABLE users (id int);\n"
    );

    let args = tools.args("mysqldump");
    assert!(args.contains(&"--single-transaction".to_string()));
    assert_eq!(&args[args.len() - 2..], ["shop", "users"]);
    assert!(!tools.defaults_path("mysqldump").exists());
}

#[tokio::test]
async fn test_dump_requires_database() {
    let tools = FakeTools::new();
    tools.mysqldump("echo x");
    let output = tools.dir.path().join("dump.sql");

    let err = tools
        .runner()
        .dump_schema(&config(None), &output, &[])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(!tools.was_called("mysqldump"));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_dump_failure_carries_stderr() {
    let tools = FakeTools::new();
    tools.mysqldump("echo \"mysqldump: Got error: 1049: Unknown database 'nope'\" >&2\nexit 2");

    let err = tools
        .runner()
        .dump_schema(&config(Some("nope")), &tools.dir.path().join("d.sql"), &[])
        .await
        .unwrap_err();

    match err {
        AppError::CommandFailed { message, stderr } => {
            assert_eq!(message, "mysqldump exited with status 2");
            assert_eq!(stderr, "mysqldump: Got error: 1049: Unknown database 'nope'");
        }
        other => panic!("Expected CommandFailed, got {other:?}"),
    }
    assert!(!tools.defaults_path("mysqldump").exists());
}

#[tokio::test]
async fn test_missing_dump_executable() {
    let tools = FakeTools::new();

    let err = tools
        .runner()
        .dump_schema(&config(Some("shop")), &tools.dir.path().join("d.sql"), &[])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ExecutableNotFound { .. }));
}

#[tokio::test]
async fn test_dump_timeout_kills_and_cleans_up() {
    let tools = FakeTools::new();
    tools.mysqldump("sleep 30");

    let start = Instant::now();
    let err = tools
        .runner()
        .with_dump_timeout(Duration::from_secs(1))
        .dump_schema(&config(Some("shop")), &tools.dir.path().join("d.sql"), &[])
        .await
        .unwrap_err();

    match err {
        AppError::Timeout { program, seconds } => {
            assert_eq!(program, "mysqldump");
            assert_eq!(seconds, 1);
        }
        other => panic!("Expected Timeout, got {other:?}"),
    }
    assert!(start.elapsed() < Duration::from_secs(10));
    assert!(!tools.defaults_path("mysqldump").exists());
}
