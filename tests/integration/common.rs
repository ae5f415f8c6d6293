//! Fake tool scripts shared by the integration tests.

use mysql_client_tui::config::{ConnectionConfig, ToolsConfig};
use mysql_client_tui::mysql::MysqlCli;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

/// Records the invocation before running the test-specific body:
/// `<name>.args` gets one argument per line, `<name>.defaults_path` the
/// credentials file path and `<name>.defaults` a copy of its contents.
const PRELUDE: &str = r#"#!/bin/sh
printf '%s\n' "$@" > "@DIR@/@NAME@.args"
for arg in "$@"; do
  case "$arg" in
    --defaults-extra-file=*)
      f="${arg#--defaults-extra-file=}"
      printf '%s' "$f" > "@DIR@/@NAME@.defaults_path"
      cp "$f" "@DIR@/@NAME@.defaults"
      ;;
  esac
done
"#;

/// A temporary directory holding fake `mysql` and `mysqldump` executables.
pub struct FakeTools {
    pub dir: TempDir,
}

impl FakeTools {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Writes an executable script `name` that records its call, then runs `body`.
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        let prelude = PRELUDE
            .replace("@DIR@", &self.dir.path().to_string_lossy())
            .replace("@NAME@", name);
        std::fs::write(&path, format!("{prelude}{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    pub fn mysql(&self, body: &str) -> PathBuf {
        self.script("mysql", body)
    }

    pub fn mysqldump(&self, body: &str) -> PathBuf {
        self.script("mysqldump", body)
    }

    /// Runner pointing at the fake scripts (which need not exist yet).
    pub fn runner(&self) -> MysqlCli {
        let tools = ToolsConfig {
            mysql: self.path("mysql").to_string_lossy().into_owned(),
            mysqldump: self.path("mysqldump").to_string_lossy().into_owned(),
            ..ToolsConfig::default()
        };
        MysqlCli::new(&tools)
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Whether the named script ran at all.
    pub fn was_called(&self, name: &str) -> bool {
        self.path(&format!("{name}.args")).exists()
    }

    /// Arguments the named script received.
    pub fn args(&self, name: &str) -> Vec<String> {
        std::fs::read_to_string(self.path(&format!("{name}.args")))
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    /// Path of the credentials file the named script was given.
    pub fn defaults_path(&self, name: &str) -> PathBuf {
        PathBuf::from(std::fs::read_to_string(self.path(&format!("{name}.defaults_path"))).unwrap())
    }

    /// Contents of the credentials file as seen by the script.
    pub fn defaults_contents(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(&format!("{name}.defaults"))).unwrap()
    }
}

pub fn config(database: Option<&str>) -> ConnectionConfig {
    ConnectionConfig::new("db.internal", 3307, "app", "s3cret pw", database).unwrap()
}
