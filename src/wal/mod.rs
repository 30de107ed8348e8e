//! Write-Ahead Log (WAL) Module
//!
//! Provides durability through an append-only operation journal.
//!
//! ## Responsibilities
//! - Append one entry per write before the index is touched
//! - Replay entries in append order on load
//! - Skip (and count) lines that fail to decode
//! - Truncate to empty after compaction
//!
//! ## File Format
//! Newline-delimited JSON, one entry per line:
//! ```text
//! {"type":0,"id":1,"timestamp":1700000000,"data":{"id":1,"name":"Alice"}}
//! {"type":1,"id":1,"timestamp":1700000005,"data":{"id":1,"name":"Alicia"}}
//! {"type":2,"id":1,"timestamp":1700000009}
//! ```
//! `type` is 0 = Insert, 1 = Update, 2 = Delete. `data` is absent for Delete.

mod entry;
mod writer;
mod reader;
mod recovery;

pub use entry::{OpKind, WalEntry};
pub use writer::WalWriter;
pub use reader::{Decoded, WalIterator, WalReader};
pub use recovery::{RecoveryResult, WalRecovery};
