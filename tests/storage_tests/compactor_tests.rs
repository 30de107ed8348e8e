//! Tests for the compactor
//!
//! These tests verify:
//! - Threshold accounting
//! - Snapshot contents and journal truncation after a run
//! - Counter and deleted-id reset

use std::fs;

use tempfile::TempDir;
use walstore::index::MemoryIndex;
use walstore::storage::{Compactor, Snapshot};
use walstore::wal::{WalEntry, WalWriter};
use walstore::WalSyncStrategy;

use crate::common::{person, Person};

struct Fixture {
    _temp: TempDir,
    snapshot: Snapshot,
    wal: WalWriter,
}

fn setup() -> Fixture {
    let temp = TempDir::new().unwrap();
    let snapshot = Snapshot::new(temp.path().join("people.json"));
    let wal = WalWriter::new(temp.path().join("people.json.wal"), WalSyncStrategy::EveryWrite);
    Fixture {
        _temp: temp,
        snapshot,
        wal,
    }
}

#[test]
fn test_threshold_accounting() {
    let mut compactor = Compactor::new(3);

    assert!(!compactor.record_write());
    assert!(!compactor.record_write());
    assert!(compactor.record_write());
    assert_eq!(compactor.operations_since_compact(), 3);
    assert_eq!(compactor.threshold(), 3);
}

#[test]
fn test_seed_counts_toward_threshold() {
    let mut compactor = Compactor::new(5);
    compactor.seed(4);

    assert!(!compactor.should_compact());
    assert!(compactor.record_write());
}

#[test]
fn test_run_writes_snapshot_and_truncates_journal() {
    let mut fx = setup();
    let mut compactor = Compactor::new(100);
    let mut index = MemoryIndex::new();

    for p in [person(2, "b"), person(1, "a")] {
        fx.wal.append(&WalEntry::insert(&p)).unwrap();
        index.upsert(p);
        compactor.record_write();
    }
    fx.wal.append(&WalEntry::<Person>::delete(2)).unwrap();
    index.remove(2);
    compactor.record_write();

    let stats = compactor.run(&mut index, &fx.snapshot, &mut fx.wal).unwrap();

    assert_eq!(stats.records_written, 1);
    assert_eq!(stats.operations_folded, 3);
    assert_eq!(compactor.operations_since_compact(), 0);
    assert!(index.deleted_ids().is_empty());
    assert_eq!(fx.snapshot.read::<Person>().unwrap(), vec![person(1, "a")]);
    assert_eq!(fs::metadata(fx.wal.path()).unwrap().len(), 0);
}

#[test]
fn test_run_failure_keeps_counter() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing");
    let snapshot = Snapshot::new(missing.join("people.json"));
    let mut wal = WalWriter::new(missing.join("people.json.wal"), WalSyncStrategy::EveryWrite);
    let mut compactor = Compactor::new(1);
    compactor.record_write();
    let mut index = MemoryIndex::from_records(vec![person(1, "a")]);
    index.remove(1);

    assert!(compactor.run(&mut index, &snapshot, &mut wal).is_err());
    assert_eq!(compactor.operations_since_compact(), 1);
    assert!(index.deleted_ids().contains(&1));
}
