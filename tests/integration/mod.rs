//! Library-level integration tests: the query runner on the real engine and
//! the directory browser on real directories.

pub mod browser_test;
pub mod engine_test;
