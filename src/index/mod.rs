//! Memory Index Module
//!
//! In-memory source of truth for the current record set.
//!
//! ## Responsibilities
//! - Point lookups, ordered scans, offset/limit ranges and batch lookups
//! - Idempotent replay of journal entries (upsert-by-id / remove-by-id)
//! - Bookkeeping of ids deleted since the last compaction
//!
//! ## Data Structure Choice
//! `BTreeMap` keyed by record id, so iteration is always ascending by id.

mod table;

pub use table::MemoryIndex;
