//! Shared fixtures for the integration test crates

#![allow(dead_code)]

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use walstore::{Record, RecordId, Store, StoreConfig, WalSyncStrategy};

/// Minimal record used across tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: RecordId,
    pub name: String,
}

impl Record for Person {
    fn id(&self) -> RecordId {
        self.id
    }
}

pub fn person(id: RecordId, name: &str) -> Person {
    Person {
        id,
        name: name.to_string(),
    }
}

pub fn setup_temp_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("people.json");
    (temp_dir, path)
}

pub fn config_for(path: &PathBuf, threshold: u64) -> StoreConfig {
    StoreConfig::builder()
        .base_path(path)
        .compact_threshold(threshold)
        .wal_sync_strategy(WalSyncStrategy::EveryWrite)
        .build()
}

pub fn open_store(path: &PathBuf, threshold: u64) -> Store<Person> {
    Store::open(config_for(path, threshold)).unwrap()
}

pub fn setup_temp_store(threshold: u64) -> (TempDir, PathBuf, Store<Person>) {
    let (temp_dir, path) = setup_temp_path();
    let store = open_store(&path, threshold);
    (temp_dir, path, store)
}

/// Journal lines currently on disk (missing file = no lines)
pub fn journal_lines(path: &PathBuf) -> Vec<String> {
    let wal_path = config_for(path, 1).wal_path();
    match std::fs::read_to_string(wal_path) {
        Ok(text) => text.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}
