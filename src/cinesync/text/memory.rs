use super::TextStore;
use crate::error::{Result, SyncError};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory text files for testing. Tracks every write.
#[derive(Default)]
pub struct MemoryText {
    files: HashMap<PathBuf, String>,
    read_only: HashSet<PathBuf>,
    writes: Vec<PathBuf>,
}

impl MemoryText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Writes to `path` fail with `WriteDenied`.
    pub fn deny_writes(mut self, path: impl Into<PathBuf>) -> Self {
        self.read_only.insert(path.into());
        self
    }

    pub fn content(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    /// Paths written so far, in order.
    pub fn writes(&self) -> &[PathBuf] {
        &self.writes
    }
}

impl TextStore for MemoryText {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.files.get(path).cloned())
    }

    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        if self.read_only.contains(path) {
            return Err(SyncError::WriteDenied {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only file"),
            });
        }
        self.files.insert(path.to_path_buf(), content.to_string());
        self.writes.push(path.to_path_buf());
        Ok(())
    }
}
