//! TUI widgets for the MySQL client.
//!
//! Contains reusable UI components.

pub mod dialog;
pub mod editor;
pub mod form;
pub mod header;
pub mod spinner;
pub mod table;
