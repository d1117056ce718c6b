//! TUI widgets for scratchsql.
//!
//! Contains reusable UI components.

pub mod editor;
pub mod explorer;
pub mod header;
pub mod results;
pub mod spinner;
pub mod table;
pub mod toast;
