//! Error types for mirror synchronization.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type for synchronization operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during mirror synchronization.
#[derive(Debug)]
pub enum SyncError {
    /// Failed to walk the mirror tree.
    WalkFailed { path: PathBuf, reason: String },

    /// Failed to read a local file.
    ReadFailed { path: PathBuf, source: io::Error },

    /// A path under the mirror root is not valid UTF-8 and cannot become
    /// an object key.
    InvalidKey(PathBuf),

    /// Remote metadata query failed (anything other than not-found).
    Remote { key: String, reason: String },

    /// Upload failed.
    UploadFailed { key: String, reason: String },

    /// Remote content differs from local content and overwrite was not
    /// authorized. Deliberate safety stop: the whole run aborts.
    Conflict {
        key: String,
        local_hash: String,
        remote_hash: String,
    },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::WalkFailed { path, reason } => {
                write!(f, "failed to walk {}: {}", path.display(), reason)
            }
            SyncError::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            SyncError::InvalidKey(path) => {
                write!(f, "path is not valid UTF-8: {}", path.display())
            }
            SyncError::Remote { key, reason } => {
                write!(f, "remote query failed for {}: {}", key, reason)
            }
            SyncError::UploadFailed { key, reason } => {
                write!(f, "upload failed for {}: {}", key, reason)
            }
            SyncError::Conflict {
                key,
                local_hash,
                remote_hash,
            } => {
                write!(
                    f,
                    "would overwrite {} (remote {}, local {}); pass force to allow",
                    key, remote_hash, local_hash
                )
            }
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::ReadFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
