//! Error types for the publisher.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::manifest::ManifestError;

/// Result type for publisher operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// Errors that can occur while publishing artifacts.
#[derive(Debug)]
pub enum PublishError {
    /// Build output artifact does not exist on disk. Raised before any
    /// manifest mutation.
    ArtifactMissing(PathBuf),

    /// Failed to read a file.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write or copy a file.
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// Manifest load, patch or persist failure.
    Manifest(ManifestError),

    /// Unknown target short name.
    UnknownTarget { name: String, known: Vec<String> },

    /// The external build driver reported a failure.
    BuildFailed { target: String, reason: String },
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::ArtifactMissing(path) => {
                write!(f, "build artifact not found: {}", path.display())
            }
            PublishError::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            PublishError::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            PublishError::CreateDirFailed { path, source } => {
                write!(
                    f,
                    "failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            PublishError::Manifest(err) => write!(f, "{}", err),
            PublishError::UnknownTarget { name, known } => {
                write!(
                    f,
                    "unknown target `{}` (known targets: {})",
                    name,
                    known.join(", ")
                )
            }
            PublishError::BuildFailed { target, reason } => {
                write!(f, "build failed for {}: {}", target, reason)
            }
        }
    }
}

impl std::error::Error for PublishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PublishError::ReadFailed { source, .. } => Some(source),
            PublishError::WriteFailed { source, .. } => Some(source),
            PublishError::CreateDirFailed { source, .. } => Some(source),
            PublishError::Manifest(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ManifestError> for PublishError {
    fn from(err: ManifestError) -> Self {
        PublishError::Manifest(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_missing_display() {
        let err = PublishError::ArtifactMissing(PathBuf::from("/build/dist/a.tar.xz"));
        assert_eq!(
            err.to_string(),
            "build artifact not found: /build/dist/a.tar.xz"
        );
    }

    #[test]
    fn test_unknown_target_display_lists_known() {
        let err = PublishError::UnknownTarget {
            name: "sparc-win7".to_string(),
            known: vec!["x86_64-win7".to_string(), "i686-win7".to_string()],
        };
        let text = err.to_string();
        assert!(text.contains("sparc-win7"));
        assert!(text.contains("x86_64-win7, i686-win7"));
    }
}
