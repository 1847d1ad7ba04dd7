//! Atomic file replacement shared by the collection store, the text adapter
//! and the config file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Replace `path` with `content`: write a temp file next to it, then rename.
///
/// The parent directory must exist. An existing file keeps its permissions.
/// On failure the temp file is removed and `path` is untouched.
pub(crate) fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_file = dir.join(format!(".{}-{}.tmp", name, Uuid::new_v4()));

    let staged = fs::write(&tmp_file, content).and_then(|()| {
        if let Ok(meta) = fs::metadata(path) {
            fs::set_permissions(&tmp_file, meta.permissions())?;
        }
        fs::rename(&tmp_file, path)
    });
    if staged.is_err() {
        let _ = fs::remove_file(&tmp_file);
    }
    staged
}
