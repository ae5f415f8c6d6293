//! End-to-end tests running the built binary's subcommands.

use super::common::FakeTools;
use pretty_assertions::assert_eq;
use std::process::Command;

/// Runs the binary with a clean environment: no `MYSQL_*` variables, no
/// `.env`, and a config path that does not exist.
fn run(tools: &FakeTools, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_mysql-client-tui"))
        .arg("--config")
        .arg(tools.path("missing-config.toml"))
        .arg("--mysql")
        .arg(tools.path("mysql"))
        .arg("--mysqldump")
        .arg(tools.path("mysqldump"))
        .args(args)
        .current_dir(tools.dir.path())
        .env_remove("MYSQL_HOST")
        .env_remove("MYSQL_PORT")
        .env_remove("MYSQL_USER")
        .env_remove("MYSQL_PASSWORD")
        .env_remove("MYSQL_DB")
        .env_remove("MYSQL_DATABASE")
        .output()
        .unwrap();

    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn test_query_subcommand_csv() {
    let tools = FakeTools::new();
    tools.mysql(r"printf 'id\tcity\n1\tBerlin, DE\n'");

    let (code, stdout, _) = run(&tools, &["-D", "shop", "query", "SELECT 1", "--format", "csv"]);

    assert_eq!(code, 0);
    assert_eq!(stdout, "id,city\n1,\"Berlin, DE\"\n");
}

#[test]
fn test_test_subcommand_uses_url() {
    let tools = FakeTools::new();
    tools.mysql(r"printf '1\n1\n'");

    let (code, stdout, _) = run(&tools, &["mysql://app:pw@db.local:3310/shop", "test"]);

    assert_eq!(code, 0);
    assert_eq!(stdout, "Connection OK\n");

    let defaults = tools.defaults_contents("mysql");
    assert!(defaults.contains("host=db.local\n"));
    assert!(defaults.contains("port=3310\n"));
    assert!(defaults.contains("password=pw\n"));
}

#[test]
fn test_failure_exits_nonzero() {
    let tools = FakeTools::new();
    tools.mysql("echo 'ERROR 2003 (HY000): Can not connect' >&2\nexit 1");

    let (code, stdout, stderr) = run(&tools, &["test"]);

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert_eq!(stderr.matches("ERROR 2003 (HY000): Can not connect").count(), 1);
    assert!(stderr.contains("Test connection: failed (Command Failed)"));
    assert!(stderr.contains("Error: mysql exited with status 1"));
}

#[test]
fn test_dump_subcommand() {
    let tools = FakeTools::new();
    tools.mysqldump("echo 'CREATE TABLE t (id int);'");

    let (code, stdout, _) = run(&tools, &["-D", "shop", "dump", "backup.sql", "t"]);

    assert_eq!(code, 0);
    assert!(stdout.starts_with("Exported dump"));
    assert_eq!(
        std::fs::read_to_string(tools.path("backup.sql")).unwrap(),
        "CREATE TABLE t (id int);\n"
    );
}
