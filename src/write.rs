//! Persisting rewritten files.
//!
//! A [`Rewrite`] remembers an xxh3 fingerprint of the text it was computed
//! from. Committing re-reads the file and refuses to write if the file
//! changed in between, then replaces it atomically.

use crate::safety::{ProjectGuard, SafetyError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("{path} changed on disk since it was read")]
    ConcurrentModification { path: PathBuf },

    #[error(transparent)]
    Safety(#[from] SafetyError),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "WriteResult should be checked for written/unchanged"]
pub enum WriteResult {
    Written { path: PathBuf, bytes: usize },
    /// New text equals what was read; nothing was written.
    Unchanged { path: PathBuf },
}

pub fn fingerprint(text: &str) -> u64 {
    xxh3_64(text.as_bytes())
}

/// New contents for a file, tied to the contents they were derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Rewrite does nothing until commit() is called"]
pub struct Rewrite {
    pub path: PathBuf,
    /// Fingerprint of the text the rewrite was computed from
    pub original: u64,
    pub new_text: String,
}

impl Rewrite {
    pub fn new(path: impl Into<PathBuf>, original: &str, new_text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            original: fingerprint(original),
            new_text: new_text.into(),
        }
    }

    pub fn is_noop(&self) -> bool {
        fingerprint(&self.new_text) == self.original
    }

    /// Write the new text if the file still holds the original text.
    pub fn commit(&self, guard: Option<&ProjectGuard>) -> Result<WriteResult, WriteError> {
        if self.is_noop() {
            return Ok(WriteResult::Unchanged {
                path: self.path.clone(),
            });
        }
        let path = match guard {
            Some(guard) => guard.revalidate(&self.path)?,
            None => self.path.clone(),
        };

        let current = fs::read(&path)?;
        if xxh3_64(&current) != self.original {
            return Err(WriteError::ConcurrentModification { path });
        }

        atomic_write(&path, self.new_text.as_bytes())?;

        // Bump mtime so `go build` notices the change even within the same second
        filetime::set_file_mtime(&path, filetime::FileTime::now())?;

        Ok(WriteResult::Written {
            path,
            bytes: self.new_text.len(),
        })
    }
}

/// Atomic file write: tempfile in the same directory + fsync + rename.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), WriteError> {
    let parent = path.parent().ok_or_else(|| {
        WriteError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no parent directory",
        ))
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
