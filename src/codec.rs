//! Record Codec
//!
//! The contract a record type must satisfy to be stored: a stable unique
//! integer id, and serde-based encoding to the JSON representation shared by
//! the snapshot and the journal.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unique, non-negative record identifier
pub type RecordId = u64;

/// A record that can live in a [`Store`](crate::Store)
///
/// The id must be stable for the lifetime of the record: the store keys its
/// index, its journal entries and its snapshot by it.
pub trait Record: Serialize + DeserializeOwned + Clone {
    fn id(&self) -> RecordId;
}

/// Schema-less record: an id plus arbitrary JSON fields
///
/// Used by tooling that inspects a store without knowing its record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: RecordId,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    /// Builder-style field setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

impl Record for Document {
    fn id(&self) -> RecordId {
        self.id
    }
}
