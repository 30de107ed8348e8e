//! # walstore
//!
//! An embedded store for collections of id-keyed records with:
//! - An append-only JSON journal (write-ahead log) for durability
//! - Lazy index construction: snapshot, then journal replay
//! - Best-effort replay that skips and counts malformed journal lines
//! - Threshold-driven compaction into a pretty-printed JSON snapshot
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Store<T> (facade)                         │
//! │    insert / update / delete / save / clear / load_*          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────┐
//!   │     WAL     │          │ MemoryIndex  │
//!   │  (Append)   │          │  (BTreeMap)  │
//!   └──────┬──────┘          └──────┬───────┘
//!          │                        │
//!          └───────────┬────────────┘
//!                      ▼
//!              ┌──────────────┐
//!              │  Compactor   │
//!              │  → Snapshot  │
//!              └──────────────┘
//! ```
//!
//! ## Example
//! ```no_run
//! use serde::{Deserialize, Serialize};
//! use walstore::{Record, RecordId, Store};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Student {
//!     id: RecordId,
//!     name: String,
//! }
//!
//! impl Record for Student {
//!     fn id(&self) -> RecordId {
//!         self.id
//!     }
//! }
//!
//! let mut store = Store::<Student>::open_path("students.json")?;
//! store.insert(Student { id: 1, name: "Alice".into() })?;
//! assert_eq!(store.load_by_id(1)?.name, "Alice");
//! # Ok::<(), walstore::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod codec;

pub mod wal;
pub mod index;
pub mod storage;
pub mod engine;
pub mod repository;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::{StoreConfig, WalSyncStrategy};
pub use codec::{Document, Record, RecordId};
pub use engine::{SharedStore, Store};
pub use repository::Repository;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of walstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
