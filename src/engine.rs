//! Engine Module
//!
//! The storage facade that coordinates the journal, the index and the
//! compactor.
//!
//! ## Responsibilities
//! - Build the index lazily on first access (snapshot, then journal replay)
//! - Journal every write before applying it to the index
//! - Trigger compaction once the write threshold is reached
//! - Serve all reads from memory once loaded

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::codec::{Record, RecordId};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::index::MemoryIndex;
use crate::storage::{CompactionStats, Compactor, Snapshot};
use crate::wal::{RecoveryResult, WalEntry, WalRecovery, WalWriter};

/// A durable, id-keyed record collection
///
/// ## Ownership Model
///
/// One `Store` owns one (snapshot, journal) file pair. Every method takes
/// `&mut self`: reads may have to build the index first. There is no
/// internal locking; callers that share a store across threads wrap it in a
/// [`SharedStore`]. Two stores (or two processes) on the same files are not
/// supported.
///
/// ## Write Ordering
///
/// - journal append (confirmed on disk) → index mutation → compaction check
///
/// A failed append leaves the index untouched.
pub struct Store<T> {
    /// Store configuration
    config: StoreConfig,

    /// Snapshot file (the base path)
    snapshot: Snapshot,

    /// Journal file (`{base_path}.wal`)
    wal: WalWriter,

    /// Write counter and compaction driver
    compactor: Compactor,

    /// In-memory records; meaningful only once `loaded` is set
    index: MemoryIndex<T>,
    loaded: bool,

    /// Journal statistics from the most recent load
    last_recovery: Option<RecoveryResult>,
}

impl<T: Record> Store<T> {
    /// Open a store with the given config
    ///
    /// Only validates the config and creates the parent directory; the
    /// snapshot and journal are read on first access.
    pub fn open(config: StoreConfig) -> Result<Self> {
        config.validate()?;

        if let Some(parent) = config.base_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let snapshot = Snapshot::new(config.snapshot_path());
        let wal = WalWriter::new(config.wal_path(), config.wal_sync_strategy);
        let compactor = Compactor::new(config.compact_threshold);

        debug!(
            snapshot = %config.snapshot_path().display(),
            threshold = config.compact_threshold,
            "store opened"
        );

        Ok(Self {
            config,
            snapshot,
            wal,
            compactor,
            index: MemoryIndex::new(),
            loaded: false,
            last_recovery: None,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified base path
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(StoreConfig::builder().base_path(path).build())
    }

    // =========================================================================
    // Lazy Load
    // =========================================================================

    /// Build the index if it has not been built yet
    fn ensure_loaded(&mut self) -> Result<()> {
        if self.loaded {
            return Ok(());
        }

        let mut index = MemoryIndex::from_records(self.snapshot.load::<T>());
        let from_snapshot = index.len();

        let (entries, recovery) = WalRecovery::recover::<T>(self.wal.path())?;
        for entry in &entries {
            index.apply(entry);
        }

        if !recovery.is_clean() {
            warn!(
                skipped = recovery.entries_corrupted,
                "journal replay skipped malformed entries"
            );
        }
        info!(
            from_snapshot,
            replayed = recovery.entries_recovered,
            records = index.len(),
            "index loaded"
        );

        self.compactor.seed(recovery.entries_recovered);
        self.index = index;
        self.loaded = true;
        self.last_recovery = Some(recovery);
        Ok(())
    }

    /// Forget the in-memory state so the next access reloads from disk
    fn invalidate(&mut self) {
        self.index = MemoryIndex::new();
        self.loaded = false;
    }

    // =========================================================================
    // Write Path
    // =========================================================================

    /// Insert a record (upsert by id)
    pub fn insert(&mut self, record: T) -> Result<()> {
        self.ensure_loaded()?;
        self.wal.append(&WalEntry::insert(&record))?;
        self.index.upsert(record);
        self.after_write()
    }

    /// Replace an existing record
    ///
    /// Fails with `NotFound` if no record has this id.
    pub fn update(&mut self, record: T) -> Result<()> {
        self.ensure_loaded()?;
        let id = record.id();
        if !self.index.contains(id) {
            return Err(StoreError::NotFound { id });
        }
        self.wal.append(&WalEntry::update(&record))?;
        self.index.upsert(record);
        self.after_write()
    }

    /// Delete a record, returning it
    ///
    /// Fails with `NotFound` if no record has this id.
    pub fn delete(&mut self, id: RecordId) -> Result<T> {
        self.ensure_loaded()?;
        if !self.index.contains(id) {
            return Err(StoreError::NotFound { id });
        }
        self.wal.append(&WalEntry::<T>::delete(id))?;
        let removed = self.index.remove(id).ok_or(StoreError::NotFound { id })?;
        self.after_write()?;
        Ok(removed)
    }

    /// Replace the whole collection and compact immediately
    ///
    /// The current contents (loaded or not) are discarded. On duplicate ids
    /// the last record wins.
    pub fn save<I>(&mut self, records: I) -> Result<CompactionStats>
    where
        I: IntoIterator<Item = T>,
    {
        self.index = MemoryIndex::from_records(records);
        self.loaded = true;
        self.compact_or_invalidate()
    }

    /// Remove every record; leaves an empty snapshot and an empty journal
    pub fn clear(&mut self) -> Result<CompactionStats> {
        self.index.clear();
        self.loaded = true;
        self.compact_or_invalidate()
    }

    /// Compact now, regardless of the write counter
    pub fn force_compact(&mut self) -> Result<CompactionStats> {
        self.ensure_loaded()?;
        self.compactor
            .run(&mut self.index, &self.snapshot, &mut self.wal)
    }

    fn after_write(&mut self) -> Result<()> {
        if self.compactor.record_write() {
            self.compactor
                .run(&mut self.index, &self.snapshot, &mut self.wal)?;
        }
        Ok(())
    }

    /// Compact a caller-supplied index; on failure the durable state is
    /// whatever made it to disk, so drop memory and reload later
    fn compact_or_invalidate(&mut self) -> Result<CompactionStats> {
        match self
            .compactor
            .run(&mut self.index, &self.snapshot, &mut self.wal)
        {
            Ok(stats) => Ok(stats),
            Err(e) => {
                warn!(error = %e, "compaction failed, discarding in-memory index");
                self.invalidate();
                Err(e)
            }
        }
    }

    // =========================================================================
    // Query Path
    // =========================================================================

    /// Get a record by id
    pub fn load_by_id(&mut self, id: RecordId) -> Result<T> {
        self.ensure_loaded()?;
        self.index
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    /// All records in ascending id order
    pub fn load_all(&mut self) -> Result<Vec<T>> {
        self.ensure_loaded()?;
        Ok(self.index.values().cloned().collect())
    }

    /// Up to `limit` records after skipping `offset`, in ascending id order
    pub fn load_range(&mut self, offset: usize, limit: usize) -> Result<Vec<T>> {
        self.ensure_loaded()?;
        Ok(self.index.range(offset, limit))
    }

    /// Records for `ids`, in the given order; unknown ids are left out
    pub fn load_by_ids(&mut self, ids: &[RecordId]) -> Result<Vec<T>> {
        self.ensure_loaded()?;
        Ok(self.index.by_ids(ids))
    }

    pub fn exists(&mut self, id: RecordId) -> Result<bool> {
        self.ensure_loaded()?;
        Ok(self.index.contains(id))
    }

    /// Number of live records
    pub fn count(&mut self) -> Result<usize> {
        self.ensure_loaded()?;
        Ok(self.index.len())
    }

    /// Ids deleted since the last compaction
    pub fn deleted_ids(&mut self) -> Result<&BTreeSet<RecordId>> {
        self.ensure_loaded()?;
        Ok(self.index.deleted_ids())
    }

    /// Close the store, syncing any journal writes not yet fsynced
    pub fn close(mut self) -> Result<()> {
        self.wal.sync()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Journaled writes since the last compaction
    ///
    /// Before the first load this does not include entries already sitting
    /// in the journal.
    pub fn operations_since_compact(&self) -> u64 {
        self.compactor.operations_since_compact()
    }

    /// Whether the index has been built
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Journal statistics from the most recent load
    pub fn last_recovery(&self) -> Option<&RecoveryResult> {
        self.last_recovery.as_ref()
    }

    pub fn snapshot_path(&self) -> &Path {
        self.snapshot.path()
    }

    pub fn wal_path(&self) -> &Path {
        self.wal.path()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

/// A store shared across threads
///
/// Every call holds the mutex for its whole duration, so operations from
/// different threads are applied and journaled one at a time.
pub struct SharedStore<T> {
    inner: Arc<Mutex<Store<T>>>,
}

impl<T> Clone for SharedStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Record> SharedStore<T> {
    pub fn new(store: Store<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` with exclusive access to the store
    pub fn with<R>(&self, f: impl FnOnce(&mut Store<T>) -> R) -> R {
        let mut store = self.inner.lock();
        f(&mut store)
    }

    /// Lock the store for a sequence of calls
    pub fn lock(&self) -> MutexGuard<'_, Store<T>> {
        self.inner.lock()
    }
}
