//! WAL Entry definitions
//!
//! Defines the structure of individual journal entries and their line codec.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::codec::{Record, RecordId};
use crate::error::{Result, StoreError};

/// Kind of write recorded by an entry, serialized as its integer tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OpKind {
    Insert = 0,
    Update = 1,
    Delete = 2,
}

impl From<OpKind> for u8 {
    fn from(kind: OpKind) -> u8 {
        kind as u8
    }
}

impl TryFrom<u8> for OpKind {
    type Error = String;

    fn try_from(tag: u8) -> std::result::Result<Self, Self::Error> {
        match tag {
            0 => Ok(OpKind::Insert),
            1 => Ok(OpKind::Update),
            2 => Ok(OpKind::Delete),
            other => Err(format!("unknown operation type {}", other)),
        }
    }
}

/// A single entry in the journal
///
/// `data` is present for Insert/Update and absent for Delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalEntry<T> {
    /// The operation to perform
    #[serde(rename = "type")]
    pub kind: OpKind,

    /// Id of the record the operation targets
    pub id: RecordId,

    /// Timestamp (unix seconds) when the entry was created
    pub timestamp: u64,

    /// Full record payload for upserts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Record> WalEntry<T> {
    pub fn insert(record: &T) -> Self {
        Self::upsert(OpKind::Insert, record)
    }

    pub fn update(record: &T) -> Self {
        Self::upsert(OpKind::Update, record)
    }

    pub fn delete(id: RecordId) -> Self {
        Self {
            kind: OpKind::Delete,
            id,
            timestamp: now_secs(),
            data: None,
        }
    }

    fn upsert(kind: OpKind, record: &T) -> Self {
        Self {
            kind,
            id: record.id(),
            timestamp: now_secs(),
            data: Some(record.clone()),
        }
    }

    /// Encode as a single JSON line (without the trailing newline)
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode and validate one journal line
    ///
    /// Upserts must carry a payload whose own id matches the entry id.
    pub fn decode(line: &[u8]) -> Result<Self> {
        let mut entry: Self = serde_json::from_slice(line)?;
        match entry.kind {
            OpKind::Insert | OpKind::Update => {
                let record = entry.data.as_ref().ok_or_else(|| {
                    StoreError::Format(format!(
                        "{:?} entry for id {} has no data",
                        entry.kind, entry.id
                    ))
                })?;
                if record.id() != entry.id {
                    return Err(StoreError::Format(format!(
                        "entry id {} does not match payload id {}",
                        entry.id,
                        record.id()
                    )));
                }
            }
            OpKind::Delete => entry.data = None,
        }
        Ok(entry)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
