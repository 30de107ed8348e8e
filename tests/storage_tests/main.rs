//! Snapshot and compactor tests

#[path = "../common/mod.rs"]
mod common;

mod snapshot_tests;
mod compactor_tests;
