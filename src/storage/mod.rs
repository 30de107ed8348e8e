//! Storage Module
//!
//! Durable state outside the journal: the snapshot file and the compactor
//! that folds the journal into it.
//!
//! ## Responsibilities
//! - Read the snapshot on lazy load (absent or unreadable = empty; content
//!   that does not parse is first renamed to `<path>.corrupt`)
//! - Rewrite the snapshot wholesale, atomically, on compaction
//! - Truncate the journal only after the snapshot is durable
//!
//! ## Durable Replace
//! 1. Write the records to `<path>.tmp`
//! 2. fsync the temp file
//! 3. Rename it over `<path>`
//! 4. fsync the parent directory (Unix), so the rename survives a power cut
//!
//! Only then may the journal be truncated.
//!
//! ## File Format
//! A pretty-printed JSON array of records, no duplicate ids:
//! ```text
//! [
//!   {
//!     "id": 1,
//!     "name": "Alicia"
//!   }
//! ]
//! ```

mod snapshot;
mod compactor;

pub use snapshot::Snapshot;
pub use compactor::{CompactionStats, Compactor};
