//! Snapshot file
//!
//! Full materialization of the index as of the last compaction.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serializer;
use tracing::{debug, warn};

use crate::codec::Record;
use crate::error::{Result, StoreError};

/// The snapshot file of a store
#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    const TMP_SUFFIX: &'static str = ".tmp";
    const CORRUPT_SUFFIX: &'static str = ".corrupt";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the snapshot strictly
    ///
    /// A missing file is an empty snapshot; unreadable or malformed content
    /// is an error.
    pub fn read<T: Record>(&self) -> Result<Vec<T>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Read the snapshot for bootstrap
    ///
    /// Any failure yields an empty collection: first run and a damaged
    /// snapshot both start from nothing. Content that does not parse is
    /// renamed to `<path>.corrupt` first, so the next compaction cannot
    /// overwrite it.
    pub fn load<T: Record>(&self) -> Vec<T> {
        match self.read() {
            Ok(records) => {
                debug!(path = %self.path.display(), records = records.len(), "snapshot loaded");
                records
            }
            Err(e @ (StoreError::Json(_) | StoreError::Format(_))) => {
                let corrupt_path = self.corrupt_path();
                match fs::rename(&self.path, &corrupt_path) {
                    Ok(()) => warn!(
                        path = %self.path.display(),
                        moved_to = %corrupt_path.display(),
                        error = %e,
                        "snapshot malformed, set aside and starting from an empty collection"
                    ),
                    Err(rename_err) => warn!(
                        path = %self.path.display(),
                        error = %e,
                        rename_error = %rename_err,
                        "snapshot malformed and could not be set aside, starting from an empty collection"
                    ),
                }
                Vec::new()
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "snapshot unreadable, starting from an empty collection"
                );
                Vec::new()
            }
        }
    }

    /// Replace the snapshot with `records`
    ///
    /// Writes a sibling temp file, syncs it, renames it over the snapshot,
    /// then syncs the parent directory so the rename itself is durable.
    /// Returns the number of records written.
    pub fn write<'a, T, I>(&self, records: I) -> Result<usize>
    where
        T: Record + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let tmp_path = self.tmp_path();
        let mut written = 0usize;

        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            let mut ser = serde_json::Serializer::pretty(&mut writer);
            (&mut ser).collect_seq(records.into_iter().inspect(|_| written += 1))?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }

        fs::rename(&tmp_path, &self.path)?;
        sync_parent_dir(&self.path)?;
        Ok(written)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a malformed snapshot is moved by `load`
    pub fn corrupt_path(&self) -> PathBuf {
        self.with_suffix(Self::CORRUPT_SUFFIX)
    }

    fn tmp_path(&self) -> PathBuf {
        self.with_suffix(Self::TMP_SUFFIX)
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut raw = self.path.clone().into_os_string();
        raw.push(suffix);
        PathBuf::from(raw)
    }
}

/// Flush the directory entry of `path` to disk
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}
