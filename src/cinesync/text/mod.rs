//! # Text Target Layer
//!
//! Whole-file access to plain-text configuration artifacts (`.env` files,
//! TypeScript config modules, `application.properties`, Java sources).
//!
//! Content is opaque UTF-8 text. A missing file is not an error: `read`
//! returns `Ok(None)` and callers decide how to report it.

use crate::error::Result;
use std::path::Path;

pub mod fs;
pub mod memory;

/// Abstract interface for reading and replacing text files.
pub trait TextStore {
    /// Read the whole file.
    /// Returns Ok(None) if the file does not exist.
    fn read(&self, path: &Path) -> Result<Option<String>>;

    /// Replace the whole file.
    /// MUST be atomic: readers see either the old or the new content.
    /// Fails with `WriteDenied`.
    fn write(&mut self, path: &Path, content: &str) -> Result<()>;
}
