//! Mirror tree scanning.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::{SyncError, SyncResult};

/// A file discovered in the mirror tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorEntry {
    /// POSIX-style path relative to the mirror root; doubles as the
    /// remote object key.
    pub key: String,

    /// Absolute path of the local file.
    pub path: PathBuf,
}

/// Recursively scan the mirror tree.
///
/// Returns every regular file as a [`MirrorEntry`], sorted by key so runs
/// process files in a stable order regardless of filesystem enumeration.
///
/// # Errors
///
/// Any unreadable directory aborts the scan; a non-UTF-8 path cannot
/// become an object key and is an error rather than a silent skip.
pub fn scan_mirror(root: &Path) -> SyncResult<Vec<MirrorEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| SyncError::WalkFailed {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            reason: e.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let relative = path
            .strip_prefix(root)
            .expect("walked path is under the root");

        let mut parts = Vec::new();
        for component in relative.components() {
            match component.as_os_str().to_str() {
                Some(part) => parts.push(part),
                None => return Err(SyncError::InvalidKey(path.clone())),
            }
        }

        entries.push(MirrorEntry {
            key: parts.join("/"),
            path,
        });
    }

    entries.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(entries)
}
