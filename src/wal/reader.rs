//! WAL Reader
//!
//! Handles reading entries from the journal file, one line at a time.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Split};
use std::marker::PhantomData;
use std::path::Path;

use super::WalEntry;
use crate::codec::Record;
use crate::error::Result;

/// Outcome of decoding one non-blank journal line
#[derive(Debug)]
pub enum Decoded<T> {
    Entry(WalEntry<T>),

    /// The line could not be decoded; `line` is 1-based
    Malformed { line: u64, reason: String },
}

/// Reads raw lines from the journal file
pub struct WalReader {
    lines: Split<BufReader<File>>,
    line_no: u64,
}

impl WalReader {
    /// Open a journal for reading
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn open(path: &Path) -> Result<Option<Self>> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(Self {
            lines: BufReader::new(file).split(b'\n'),
            line_no: 0,
        }))
    }

    /// Read the next non-blank line with its 1-based line number
    ///
    /// Lines are returned as bytes so invalid UTF-8 surfaces as a decode
    /// failure of that line only.
    pub fn next_line(&mut self) -> Result<Option<(u64, Vec<u8>)>> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_no += 1;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return Ok(Some((self.line_no, line)));
        }
        Ok(None)
    }

    /// Iterate over decoded lines
    pub fn entries<T: Record>(self) -> WalIterator<T> {
        WalIterator {
            reader: self,
            _record: PhantomData,
        }
    }
}

/// Iterator over decoded journal lines
///
/// Yields `Err` only for I/O failures; a bad line is `Decoded::Malformed`.
pub struct WalIterator<T> {
    reader: WalReader,
    _record: PhantomData<T>,
}

impl<T: Record> Iterator for WalIterator<T> {
    type Item = Result<Decoded<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.next_line() {
            Ok(Some((line, bytes))) => Some(Ok(match WalEntry::decode(&bytes) {
                Ok(entry) => Decoded::Entry(entry),
                Err(e) => Decoded::Malformed {
                    line,
                    reason: e.to_string(),
                },
            })),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
