//! Integration tests for mysql-client-tui.
//!
//! These stage fake `mysql` / `mysqldump` shell scripts in a temporary
//! directory, so they run without a MySQL installation (Unix only).
//!
//! Run with: `cargo test --test integration_tests`

#[cfg(unix)]
mod integration;
