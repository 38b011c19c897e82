//! Write-to-temp-then-rename file emission.
//!
//! Bytes are written to a [`NamedTempFile`] in the destination directory,
//! flushed with `sync_all`, and only then renamed onto the final name. A
//! staged file that is dropped without being committed deletes its temp.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// A fully written temp file waiting to be renamed into place.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    target: PathBuf,
    len: u64,
}

impl StagedFile {
    /// Writes `bytes` next to `target` without touching `target` itself.
    pub fn new(target: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self> {
        let target = target.into();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| Error::write(&dir, e))?;

        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| Error::write(&target, e))?;
        temp.write_all(bytes).map_err(|e| Error::write(temp.path(), e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| Error::write(temp.path(), e))?;

        Ok(Self {
            temp,
            target,
            len: bytes.len() as u64,
        })
    }

    /// Final destination.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Renames the temp file onto the target.
    pub fn commit(self) -> Result<(PathBuf, u64)> {
        let Self { temp, target, len } = self;
        if target.exists() {
            tracing::warn!(path = %target.display(), "overwriting existing output");
        }
        temp.persist(&target)
            .map_err(|e| Error::write(&target, e.error))?;
        tracing::debug!(path = %target.display(), bytes = len, "persisted");
        Ok((target, len))
    }
}

/// Atomically replaces `path` with `bytes`, returning the byte count.
pub fn write_atomic(path: impl AsRef<Path>, bytes: &[u8]) -> Result<u64> {
    StagedFile::new(path.as_ref(), bytes)?
        .commit()
        .map(|(_, len)| len)
}

/// A batch of staged files committed together.
///
/// Nothing becomes visible until [`commit`](Self::commit); dropping the
/// batch instead removes every temp file.
#[derive(Debug, Default)]
pub struct Staging {
    files: Vec<StagedFile>,
}

impl Staging {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages one file.
    pub fn add(&mut self, target: impl Into<PathBuf>, bytes: &[u8]) -> Result<()> {
        self.files.push(StagedFile::new(target, bytes)?);
        Ok(())
    }

    /// Number of staged files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Renames every staged file into place, in staging order.
    pub fn commit(self) -> Result<Vec<(PathBuf, u64)>> {
        self.files.into_iter().map(StagedFile::commit).collect()
    }
}
