//! scratchsql - A terminal SQL scratchpad with a file explorer.
//!
//! This library exposes the core modules for the binary and integration tests.

pub mod browser;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod oneshot;
pub mod query;
pub mod reactive;
pub mod tui;
