//! Configuration for walstore
//!
//! Centralized configuration with sensible defaults.

use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// Main configuration for a store instance
#[derive(Debug, Clone)]
pub struct StoreConfig {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Base path of the store. Both backing files derive from it:
    ///   {base_path}        (snapshot, pretty-printed JSON array)
    ///   {base_path}.wal    (journal, one JSON entry per line)
    pub base_path: PathBuf,

    // -------------------------------------------------------------------------
    // Compaction Configuration
    // -------------------------------------------------------------------------
    /// Number of journaled writes that triggers an automatic compaction
    pub compact_threshold: u64,

    // -------------------------------------------------------------------------
    // WAL Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: how often to fsync the journal
    pub wal_sync_strategy: WalSyncStrategy,
}

/// WAL sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalSyncStrategy {
    /// fsync after every write (safest, slowest)
    EveryWrite,

    /// fsync after N appended entries (balanced durability/performance)
    EveryNEntries { count: u64 },
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./walstore_data.json"),
            compact_threshold: 100,
            wal_sync_strategy: WalSyncStrategy::EveryWrite,
        }
    }
}

impl StoreConfig {
    /// Suffix appended to the base path to name the journal file
    pub const WAL_SUFFIX: &'static str = ".wal";

    /// Create a new config builder
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Path of the snapshot file
    pub fn snapshot_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the journal file (`{base_path}.wal`)
    pub fn wal_path(&self) -> PathBuf {
        let mut raw = self.base_path.clone().into_os_string();
        raw.push(Self::WAL_SUFFIX);
        PathBuf::from(raw)
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.base_path.as_os_str().is_empty() {
            return Err(StoreError::Config("base path must not be empty".to_string()));
        }
        if self.compact_threshold == 0 {
            return Err(StoreError::Config(
                "compact threshold must be positive".to_string(),
            ));
        }
        if let WalSyncStrategy::EveryNEntries { count: 0 } = self.wal_sync_strategy {
            return Err(StoreError::Config(
                "sync interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the base path (snapshot file; the journal sits next to it)
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.base_path = path.into();
        self
    }

    /// Set the number of writes between automatic compactions
    pub fn compact_threshold(mut self, threshold: u64) -> Self {
        self.config.compact_threshold = threshold;
        self
    }

    /// Set the WAL sync strategy
    pub fn wal_sync_strategy(mut self, strategy: WalSyncStrategy) -> Self {
        self.config.wal_sync_strategy = strategy;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}
