//! MemoryIndex implementation

use std::collections::{BTreeMap, BTreeSet};

use crate::codec::{Record, RecordId};
use crate::wal::{OpKind, WalEntry};

/// Ordered mapping from record id to record
#[derive(Debug, Clone)]
pub struct MemoryIndex<T> {
    records: BTreeMap<RecordId, T>,

    /// Ids deleted since the last compaction. Reads never consult this;
    /// removal from `records` already hides the id.
    deleted: BTreeSet<RecordId>,
}

impl<T> Default for MemoryIndex<T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            deleted: BTreeSet::new(),
        }
    }
}

impl<T: Record> MemoryIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a full collection; on duplicate ids the last one wins
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut index = Self::new();
        for record in records {
            index.upsert(record);
        }
        index
    }

    /// Insert or replace the record under its id
    pub fn upsert(&mut self, record: T) -> Option<T> {
        let id = record.id();
        self.deleted.remove(&id);
        self.records.insert(id, record)
    }

    /// Remove a record, remembering the id as deleted
    pub fn remove(&mut self, id: RecordId) -> Option<T> {
        let removed = self.records.remove(&id);
        if removed.is_some() {
            self.deleted.insert(id);
        }
        removed
    }

    /// Apply one journal entry
    ///
    /// Applying the same entry twice leaves the index as applying it once.
    pub fn apply(&mut self, entry: &WalEntry<T>) {
        match (entry.kind, &entry.data) {
            (OpKind::Insert | OpKind::Update, Some(record)) => {
                self.upsert(record.clone());
            }
            (OpKind::Insert | OpKind::Update, None) => {}
            (OpKind::Delete, _) => {
                self.remove(entry.id);
            }
        }
    }

    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ascending id order
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }

    /// Skip `offset` records (clamped), then take up to `limit`
    pub fn range(&self, offset: usize, limit: usize) -> Vec<T> {
        self.records
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Records for `ids` in the caller's order; missing ids are omitted
    pub fn by_ids(&self, ids: &[RecordId]) -> Vec<T> {
        ids.iter()
            .filter_map(|id| self.records.get(id))
            .cloned()
            .collect()
    }

    pub fn deleted_ids(&self) -> &BTreeSet<RecordId> {
        &self.deleted
    }

    pub fn clear_deleted(&mut self) {
        self.deleted.clear();
    }

    /// Drop every record and the deleted-id bookkeeping
    pub fn clear(&mut self) {
        self.records.clear();
        self.deleted.clear();
    }
}
