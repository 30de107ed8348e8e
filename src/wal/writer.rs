//! WAL Writer
//!
//! Handles appending entries to the journal file. The file handle is opened
//! per call and dropped before returning, on success and on error alike.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::WalEntry;
use crate::codec::Record;
use crate::config::WalSyncStrategy;
use crate::error::Result;

/// Writes entries to the journal file
#[derive(Debug)]
pub struct WalWriter {
    path: PathBuf,
    sync_strategy: WalSyncStrategy,

    /// Entries appended through this writer
    appended: u64,

    /// Entries written since the last fsync
    unsynced: u64,

    /// The file may not end on a line boundary: nothing is known about it
    /// yet, or the last append failed part way through
    tail_suspect: bool,
}

impl WalWriter {
    /// Create a writer for the journal at `path`
    ///
    /// Nothing is opened yet; the file is created on the first append.
    pub fn new(path: impl Into<PathBuf>, sync_strategy: WalSyncStrategy) -> Self {
        Self {
            path: path.into(),
            sync_strategy,
            appended: 0,
            unsynced: 0,
            tail_suspect: true,
        }
    }

    /// Append an entry to the journal
    ///
    /// Returns the number of entries appended through this writer so far.
    /// The entry is on disk (and synced, per strategy) when this returns Ok.
    /// If the file does not end on a line boundary, the entry starts with a
    /// newline so it is never glued onto a torn line.
    pub fn append<T: Record>(&mut self, entry: &WalEntry<T>) -> Result<u64> {
        let mut line = entry.encode()?;
        line.push('\n');

        let check_tail = self.tail_suspect;
        self.tail_suspect = true;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        if check_tail && !ends_on_line_boundary(&mut file)? {
            line.insert(0, '\n');
        }
        file.write_all(line.as_bytes())?;
        file.flush()?;
        self.tail_suspect = false;

        self.unsynced += 1;
        if self.should_sync() {
            file.sync_data()?;
            self.unsynced = 0;
        }

        self.appended += 1;
        debug!(
            kind = ?entry.kind,
            id = entry.id,
            appended = self.appended,
            "journal append"
        );
        Ok(self.appended)
    }

    /// Empty the journal file
    pub fn truncate(&mut self) -> Result<()> {
        let file = File::create(&self.path)?;
        file.sync_all()?;
        self.unsynced = 0;
        self.tail_suspect = false;
        debug!(path = %self.path.display(), "journal truncated");
        Ok(())
    }

    /// Force an fsync of whatever has been written
    pub fn sync(&mut self) -> Result<()> {
        if self.unsynced == 0 {
            return Ok(());
        }
        match OpenOptions::new().append(true).open(&self.path) {
            Ok(file) => file.sync_all()?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.unsynced = 0;
        Ok(())
    }

    fn should_sync(&self) -> bool {
        match self.sync_strategy {
            WalSyncStrategy::EveryWrite => true,
            WalSyncStrategy::EveryNEntries { count } => self.unsynced >= count,
        }
    }

    /// Entries appended through this writer
    pub fn appended(&self) -> u64 {
        self.appended
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// True when the file is empty or its last byte is a newline
fn ends_on_line_boundary(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
