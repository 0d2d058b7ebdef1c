//! Staging of build outputs into the mirror's artifact directory.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::digest::file_digest;
use crate::mirror::{built_artifact_filename, published_artifact_filename};
use crate::target::Target;

use super::error::{PublishError, PublishResult};

/// An artifact staged into the mirror, ready for manifest registration.
#[derive(Debug, Clone)]
pub struct PublishedArtifact {
    /// Rustc target triple.
    pub target: String,

    /// SHA-256 hash of the artifact contents.
    pub hash: String,

    /// Hash-qualified public filename inside the custom artifact directory.
    pub filename: String,
}

/// Stage one target's build output into the mirror.
///
/// Locates `{component}-{dist_version}-{triple}.tar.xz` in the build dist
/// directory, hashes it, and copies it into `custom_dir` under its
/// hash-qualified public name. The source file is copied, never moved, so
/// re-runs can re-stage from the same build output.
///
/// Identical content produces an identical public name, so re-staging the
/// same build overwrites the file with the same bytes; differing content
/// lands under a different name and never clobbers a published artifact.
///
/// # Errors
///
/// [`PublishError::ArtifactMissing`] if the build output does not exist;
/// this fires before the manifest is ever loaded.
pub fn stage_artifact(
    build_dist_dir: &Path,
    custom_dir: &Path,
    component: &str,
    dist_version: &str,
    version: &str,
    target: &Target,
) -> PublishResult<PublishedArtifact> {
    let built_name = built_artifact_filename(component, dist_version, target.rust_target);
    let source = build_dist_dir.join(&built_name);

    if !source.is_file() {
        return Err(PublishError::ArtifactMissing(source));
    }

    let hash = file_digest(&source).map_err(|e| PublishError::ReadFailed {
        path: source.clone(),
        source: e,
    })?;

    let filename = published_artifact_filename(component, version, target.rust_target, &hash);

    fs::create_dir_all(custom_dir).map_err(|e| PublishError::CreateDirFailed {
        path: custom_dir.to_path_buf(),
        source: e,
    })?;

    let destination = custom_dir.join(&filename);
    fs::copy(&source, &destination).map_err(|e| PublishError::WriteFailed {
        path: destination.clone(),
        source: e,
    })?;

    info!(triple = %target.rust_target, file = %filename, "staged artifact");

    Ok(PublishedArtifact {
        target: target.rust_target.to_string(),
        hash,
        filename,
    })
}
