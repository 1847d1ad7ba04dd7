use super::EntityStore;
use crate::atomic::write_atomic;
use crate::diff::FieldDelta;
use crate::error::{Result, SyncError};
use crate::model::Record;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A collection persisted as a single JSON array.
///
/// The handle owns nothing but the path; every call re-reads the file so a
/// concurrent writer's inserts are visible to the next lookup.
pub struct JsonCollection {
    path: PathBuf,
    key_field: String,
}

impl JsonCollection {
    pub fn new(path: impl Into<PathBuf>, key_field: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key_field: key_field.into(),
        }
    }

    /// Collection `name` stored under `data_dir`.
    pub fn open(data_dir: &Path, name: &str, key_field: &str) -> Self {
        Self::new(data_dir.join(format!("{}.json", name)), key_field)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, what: &str, err: impl std::fmt::Display) -> SyncError {
        SyncError::StoreUnavailable(format!("{} {}: {}", what, self.path.display(), err))
    }

    fn load(&self) -> Result<Vec<Record>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.unavailable("read", e))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| self.unavailable("parse", e))
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        let content =
            serde_json::to_string_pretty(records).map_err(|e| self.unavailable("encode", e))?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.unavailable("create", e))?;
        }
        write_atomic(&self.path, &content).map_err(|e| self.unavailable("write", e))?;

        debug!(path = %self.path.display(), records = records.len(), "collection saved");
        Ok(())
    }

    fn position(&self, records: &[Record], identifier: &str) -> Option<usize> {
        records
            .iter()
            .position(|r| r.identifier(&self.key_field) == Some(identifier))
    }
}

impl EntityStore for JsonCollection {
    fn key_field(&self) -> &str {
        &self.key_field
    }

    fn find(&self, identifier: &str) -> Result<Option<Record>> {
        let mut records = self.load()?;
        Ok(self
            .position(&records, identifier)
            .map(|i| records.swap_remove(i)))
    }

    fn insert(&mut self, record: &Record) -> Result<String> {
        let identifier = record
            .identifier(&self.key_field)
            .ok_or_else(|| SyncError::InvalidIdentifier(record.label(&self.key_field)))?
            .to_string();

        let mut records = self.load()?;
        if self.position(&records, &identifier).is_some() {
            return Err(SyncError::DuplicateIdentifier(identifier));
        }
        records.push(record.clone());
        self.save(&records)?;

        Ok(identifier)
    }

    fn apply_delta(&mut self, identifier: &str, delta: &FieldDelta) -> Result<()> {
        if delta.is_empty() {
            return Ok(());
        }

        let mut records = self.load()?;
        let i = self
            .position(&records, identifier)
            .ok_or_else(|| SyncError::NotFound(identifier.to_string()))?;
        records[i].apply(delta);
        self.save(&records)
    }
}
