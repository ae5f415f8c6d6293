//! mysql-client-tui - a terminal front-end for the MySQL command-line tools.
//!
//! This library exposes the core modules for the binary and integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod mysql;
pub mod session;
pub mod tui;
