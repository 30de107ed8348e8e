//! Compactor
//!
//! Folds the index into a fresh snapshot and truncates the journal.
//!
//! ## Ordering
//! The snapshot is written and made durable (file and directory synced)
//! before the journal is truncated. A crash between the two leaves a
//! snapshot that already contains the journal's effects; replaying those
//! entries again is harmless because every entry is an upsert or remove
//! keyed by id.

use tracing::info;

use super::Snapshot;
use crate::codec::Record;
use crate::error::Result;
use crate::index::MemoryIndex;
use crate::wal::WalWriter;

/// Outcome of one compaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionStats {
    /// Records written to the new snapshot
    pub records_written: usize,

    /// Journaled writes folded into it
    pub operations_folded: u64,
}

/// Tracks writes since the last compaction and runs compactions
#[derive(Debug, Clone)]
pub struct Compactor {
    threshold: u64,
    operations_since_compact: u64,
}

impl Compactor {
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold,
            operations_since_compact: 0,
        }
    }

    /// Count one journaled write; returns true once the threshold is reached
    pub fn record_write(&mut self) -> bool {
        self.operations_since_compact += 1;
        self.should_compact()
    }

    pub fn should_compact(&self) -> bool {
        self.operations_since_compact >= self.threshold
    }

    /// Start counting from `count` (entries already in the journal at load)
    pub fn seed(&mut self, count: u64) {
        self.operations_since_compact = count;
    }

    pub fn operations_since_compact(&self) -> u64 {
        self.operations_since_compact
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Write the snapshot, then truncate the journal
    ///
    /// The counter and the deleted-id set are reset only once both steps
    /// succeed.
    pub fn run<T: Record>(
        &mut self,
        index: &mut MemoryIndex<T>,
        snapshot: &Snapshot,
        wal: &mut WalWriter,
    ) -> Result<CompactionStats> {
        let records_written = snapshot.write(index.values())?;
        wal.truncate()?;

        let stats = CompactionStats {
            records_written,
            operations_folded: self.operations_since_compact,
        };
        self.operations_since_compact = 0;
        index.clear_deleted();

        info!(
            snapshot = %snapshot.path().display(),
            records = stats.records_written,
            folded = stats.operations_folded,
            "compaction complete"
        );
        Ok(stats)
    }
}
