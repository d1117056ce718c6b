//! Binary-level tests driving headless and one-shot modes.

mod common;
mod execute_test;
mod headless_test;
