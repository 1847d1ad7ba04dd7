use super::EntityStore;
use crate::diff::FieldDelta;
use crate::error::{Result, SyncError};
use crate::model::Record;
use std::cell::{Cell, RefCell};

/// In-memory collection for testing and development.
/// Does NOT persist data.
///
/// Uses `Cell`/`RefCell` so the call counter and failure hooks can be driven
/// through the `&self` lookup path.
pub struct MemoryCollection {
    key_field: String,
    records: Vec<Record>,
    calls: Cell<usize>,
    unavailable: Cell<bool>,
    racing_insert: RefCell<Option<Record>>,
    vanish_before_update: Cell<bool>,
}

impl MemoryCollection {
    pub fn new(key_field: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
            records: Vec::new(),
            calls: Cell::new(0),
            unavailable: Cell::new(false),
            racing_insert: RefCell::new(None),
            vanish_before_update: Cell::new(false),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of trait calls made against this store.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Every subsequent call fails with `StoreUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    /// The next insert loses a race: `record` lands first and the insert
    /// fails with `DuplicateIdentifier`.
    pub fn race_next_insert(&self, record: Record) {
        *self.racing_insert.borrow_mut() = Some(record);
    }

    /// The next non-empty `apply_delta` finds its record deleted.
    pub fn vanish_before_update(&self) {
        self.vanish_before_update.set(true);
    }

    fn enter(&self) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        if self.unavailable.get() {
            return Err(SyncError::StoreUnavailable(
                "Simulated connection failure".to_string(),
            ));
        }
        Ok(())
    }

    fn position(&self, identifier: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.identifier(&self.key_field) == Some(identifier))
    }
}

impl EntityStore for MemoryCollection {
    fn key_field(&self) -> &str {
        &self.key_field
    }

    fn find(&self, identifier: &str) -> Result<Option<Record>> {
        self.enter()?;
        Ok(self.position(identifier).map(|i| self.records[i].clone()))
    }

    fn insert(&mut self, record: &Record) -> Result<String> {
        self.enter()?;
        let identifier = record
            .identifier(&self.key_field)
            .ok_or_else(|| SyncError::InvalidIdentifier(record.label(&self.key_field)))?
            .to_string();

        if let Some(winner) = self.racing_insert.borrow_mut().take() {
            self.records.push(winner);
        }
        if self.position(&identifier).is_some() {
            return Err(SyncError::DuplicateIdentifier(identifier));
        }

        self.records.push(record.clone());
        Ok(identifier)
    }

    fn apply_delta(&mut self, identifier: &str, delta: &FieldDelta) -> Result<()> {
        self.enter()?;
        if delta.is_empty() {
            return Ok(());
        }
        if self.vanish_before_update.replace(false) {
            if let Some(i) = self.position(identifier) {
                self.records.remove(i);
            }
        }
        let i = self
            .position(identifier)
            .ok_or_else(|| SyncError::NotFound(identifier.to_string()))?;
        self.records[i].apply(delta);
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    /// Collection keyed by `title`, pre-filled with the given records.
    pub fn movies(records: Vec<Record>) -> MemoryCollection {
        let mut store = MemoryCollection::new("title");
        store.records = records;
        store
    }
}
