//! # Entity Store Layer
//!
//! The [`EntityStore`] trait abstracts one document collection addressed by a
//! natural key (a movie title, a showroom id, a user email).
//!
//! ## Implementations
//!
//! - [`fs::JsonCollection`]: a collection persisted as one JSON file
//!   - `<data_dir>/<collection>.json`, an array of documents
//!   - rewritten atomically on every mutation
//!
//! - [`memory::MemoryCollection`]: in-memory collection for testing
//!   - no persistence
//!   - failure simulation hooks (unavailable store, insert races)
//!
//! ## Contract
//!
//! All operations are safe to retry. Applying the same delta twice leaves the
//! record in the same state, and `apply_delta` only ever writes the fields it
//! is given.

use crate::diff::FieldDelta;
use crate::error::Result;
use crate::model::Record;

pub mod fs;
pub mod memory;

/// Abstract interface over a keyed document collection.
pub trait EntityStore {
    /// Name of the field holding the natural key.
    fn key_field(&self) -> &str;

    /// Look up a record by its natural key.
    ///
    /// Returns Ok(None) if no record has that key.
    /// Fails with `StoreUnavailable` if the store cannot be read.
    fn find(&self, identifier: &str) -> Result<Option<Record>>;

    /// Create a record, returning its identifier.
    ///
    /// Fails with `DuplicateIdentifier` if the key is already taken.
    fn insert(&mut self, record: &Record) -> Result<String>;

    /// Patch only the fields named by the delta.
    ///
    /// An empty delta is a no-op. Fails with `NotFound` if the record is gone.
    fn apply_delta(&mut self, identifier: &str, delta: &FieldDelta) -> Result<()>;
}
