//! Integration tests driving the runner and the binary against fake tools.

pub mod binary_test;
pub mod common;
pub mod dump_test;
pub mod query_test;
