use super::TextStore;
use crate::atomic::write_atomic;
use crate::error::{Result, SyncError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filesystem text adapter. Relative paths resolve against `root`.
pub struct FsText {
    root: PathBuf,
}

impl FsText {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

fn denied(path: &Path, source: std::io::Error) -> SyncError {
    SyncError::WriteDenied {
        path: path.to_path_buf(),
        source,
    }
}

impl TextStore for FsText {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        let full = self.resolve(path);
        match fs::read_to_string(&full) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SyncError::Io(e)),
        }
    }

    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        let full = self.resolve(path);
        write_atomic(&full, content).map_err(|e| denied(&full, e))?;

        debug!(path = %full.display(), bytes = content.len(), "text target written");
        Ok(())
    }
}
