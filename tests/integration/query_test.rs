//! Query and connection-test integration tests against a fake `mysql`.

use super::common::{config, FakeTools};
use mysql_client_tui::error::AppError;
use mysql_client_tui::mysql::DatabaseCli;
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_query_parses_tab_separated_output() {
    let tools = FakeTools::new();
    tools.mysql(r"printf 'a\tb\n1\t2\n3\t4\n'");

    let result = tools
        .runner()
        .run_query(&config(Some("shop")), "SELECT a, b FROM t")
        .await
        .unwrap();

    assert_eq!(result.columns, vec!["a", "b"]);
    assert_eq!(result.rows, vec![vec!["1", "2"], vec!["3", "4"]]);
    assert_eq!(result.raw_output, "a\tb\n1\t2\n3\t4\n");
}

#[tokio::test]
async fn test_query_passes_credentials_through_file_only() {
    let tools = FakeTools::new();
    tools.mysql("echo x");

    tools
        .runner()
        .run_query(&config(Some("shop")), "SELECT 1")
        .await
        .unwrap();

    let args = tools.args("mysql");
    assert!(args.iter().all(|a| !a.contains("s3cret")));
    assert!(args.contains(&"--batch".to_string()));
    assert!(args.contains(&"--protocol=tcp".to_string()));
    assert_eq!(args.last().unwrap(), "--execute=SELECT 1");

    let defaults = tools.defaults_contents("mysql");
    assert!(defaults.starts_with("[client]\n"));
    assert!(defaults.contains("host=db.internal\n"));
    assert!(defaults.contains("port=3307\n"));
    assert!(defaults.contains("user=app\n"));
    assert!(defaults.contains("password=s3cret pw\n"));
    assert!(defaults.contains("database=shop\n"));
}

#[tokio::test]
async fn test_credentials_file_removed_after_success() {
    let tools = FakeTools::new();
    tools.mysql("echo x");

    tools
        .runner()
        .run_query(&config(None), "SELECT 1")
        .await
        .unwrap();

    assert!(!tools.defaults_path("mysql").exists());
}

#[tokio::test]
async fn test_nonzero_exit_carries_stderr() {
    let tools = FakeTools::new();
    tools.mysql(
        "echo \"ERROR 1045 (28000): Access denied for user 'app'@'10.0.0.1'\" >&2\nexit 1",
    );

    let err = tools
        .runner()
        .run_query(&config(None), "SELECT 1")
        .await
        .unwrap_err();

    assert_eq!(err.category(), "Command Failed");
    assert_eq!(
        err.stderr(),
        Some("ERROR 1045 (28000): Access denied for user 'app'@'10.0.0.1'")
    );
    assert!(!tools.defaults_path("mysql").exists());
}

#[tokio::test]
async fn test_timeout_kills_client_and_cleans_up() {
    let tools = FakeTools::new();
    tools.mysql("sleep 30");

    let start = Instant::now();
    let err = tools
        .runner()
        .with_query_timeout(Duration::from_secs(1))
        .run_query(&config(None), "SELECT SLEEP(30)")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Timeout { seconds: 1, .. }));
    assert!(start.elapsed() < Duration::from_secs(10));
    assert!(!tools.defaults_path("mysql").exists());
}

#[tokio::test]
async fn test_blank_sql_does_not_invoke_client() {
    let tools = FakeTools::new();
    tools.mysql("echo x");

    let result = tools
        .runner()
        .run_query(&config(None), "  \n\t ")
        .await
        .unwrap();

    assert!(result.is_empty());
    assert!(!tools.was_called("mysql"));
}

#[tokio::test]
async fn test_missing_client_executable() {
    let tools = FakeTools::new();

    let err = tools
        .runner()
        .run_query(&config(None), "SELECT 1")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ExecutableNotFound { .. }));
}

#[tokio::test]
async fn test_connection_runs_select_one() {
    let tools = FakeTools::new();
    tools.mysql(r"printf '1\n1\n'");

    tools
        .runner()
        .test_connection(&config(None))
        .await
        .unwrap();

    assert_eq!(tools.args("mysql").last().unwrap(), "--execute=SELECT 1;");
}

#[tokio::test]
async fn test_statement_without_result_set() {
    let tools = FakeTools::new();
    tools.mysql("true");

    let result = tools
        .runner()
        .run_query(&config(Some("shop")), "UPDATE t SET a = 1")
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(result.row_count(), 0);
}
