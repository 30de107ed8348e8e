//! WAL Recovery
//!
//! Replays the journal with a skip-and-continue policy: a line that fails to
//! decode is reported and counted, and replay carries on with the next one.
//! One damaged line therefore never discards the rest of the journal, at the
//! cost of not refusing to start on corruption.
//!
//! A final line without its newline is a write that was cut short. `recover`
//! repairs it before replay so the next append starts on a fresh line: a
//! tail that still decodes gets its newline, anything else is truncated away.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tracing::warn;

use super::{Decoded, WalEntry, WalReader};
use crate::codec::Record;
use crate::error::Result;

/// Handles journal replay after a restart or crash
pub struct WalRecovery;

/// Result of a recovery operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of entries successfully recovered
    pub entries_recovered: u64,

    /// Number of malformed lines skipped
    pub entries_corrupted: u64,

    /// Timestamp of the last recovered entry
    pub last_timestamp: Option<u64>,

    /// Whether a partial write was cut from the end of the journal
    pub was_truncated: bool,
}

impl RecoveryResult {
    pub fn is_clean(&self) -> bool {
        self.entries_corrupted == 0
    }
}

impl WalRecovery {
    /// Recover entries from a journal file
    ///
    /// Repairs a torn tail first, then returns all decodable entries in
    /// append order. A missing journal yields no entries.
    pub fn recover<T: Record>(path: &Path) -> Result<(Vec<WalEntry<T>>, RecoveryResult)> {
        let was_truncated = Self::repair_tail::<T>(path)?;
        let mut entries = Vec::new();
        let mut result = Self::scan(path, |entry: WalEntry<T>| entries.push(entry))?;
        result.was_truncated = was_truncated;
        Ok((entries, result))
    }

    /// Verify integrity of a journal file without modifying it
    ///
    /// A torn tail is counted as a malformed entry.
    pub fn verify<T: Record>(path: &Path) -> Result<RecoveryResult> {
        Self::scan(path, |_: WalEntry<T>| {})
    }

    /// Make the journal end on a line boundary
    ///
    /// Returns true when bytes were cut from the end.
    fn repair_tail<T: Record>(path: &Path) -> Result<bool> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        if bytes.is_empty() || bytes.ends_with(b"\n") {
            return Ok(false);
        }

        let start = bytes
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let tail = &bytes[start..];
        let mut file = OpenOptions::new().append(true).open(path)?;

        if !tail.iter().all(u8::is_ascii_whitespace) && WalEntry::<T>::decode(tail).is_ok() {
            file.write_all(b"\n")?;
            file.sync_data()?;
            return Ok(false);
        }

        file.set_len(start as u64)?;
        file.sync_data()?;
        warn!(
            path = %path.display(),
            dropped_bytes = tail.len(),
            "truncated partial write at end of journal"
        );
        Ok(true)
    }

    fn scan<T, F>(path: &Path, mut on_entry: F) -> Result<RecoveryResult>
    where
        T: Record,
        F: FnMut(WalEntry<T>),
    {
        let mut result = RecoveryResult::default();
        let Some(reader) = WalReader::open(path)? else {
            return Ok(result);
        };

        for decoded in reader.entries::<T>() {
            match decoded? {
                Decoded::Entry(entry) => {
                    result.entries_recovered += 1;
                    result.last_timestamp = Some(entry.timestamp);
                    on_entry(entry);
                }
                Decoded::Malformed { line, reason } => {
                    result.entries_corrupted += 1;
                    warn!(
                        path = %path.display(),
                        line,
                        %reason,
                        "skipping malformed journal line"
                    );
                }
            }
        }

        Ok(result)
    }
}
