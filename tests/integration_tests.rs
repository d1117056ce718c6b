//! Integration tests for scratchsql.
//!
//! Everything runs against the embedded in-memory engine and temporary
//! directories, so no external services are needed.
//!
//! Run with: `cargo test --test integration_tests`

mod integration;
mod tui;
