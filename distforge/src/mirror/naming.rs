//! Centralized artifact naming conventions.
//!
//! This module is the single source of truth for dist artifact names:
//! - build output filenames as the build driver produces them
//!   (e.g. `rust-std-nightly-x86_64-win7-windows-msvc.tar.xz`)
//! - published hash-qualified filenames
//!   (e.g. `rust-std-1.78.0-x86_64-win7-windows-msvc-<sha256>.tar.xz`)
//! - download URLs referenced from the channel manifest
//!
//! Embedding the content hash in the published name means identical content
//! always maps to the same name and differing content never collides, so
//! published artifacts are immutable.

/// Filename of a build output archive, as produced by the build driver.
///
/// # Format
///
/// `{component}-{dist_version}-{triple}.tar.xz`
///
/// # Examples
///
/// ```
/// use distforge::mirror::built_artifact_filename;
///
/// assert_eq!(
///     built_artifact_filename("rust-std", "nightly", "x86_64-win7-windows-msvc"),
///     "rust-std-nightly-x86_64-win7-windows-msvc.tar.xz"
/// );
/// ```
pub fn built_artifact_filename(component: &str, dist_version: &str, triple: &str) -> String {
    format!("{}-{}-{}.tar.xz", component, dist_version, triple)
}

/// Hash-qualified public filename of a published artifact.
///
/// # Format
///
/// `{component}-{version}-{triple}-{hash}.tar.xz`
///
/// # Examples
///
/// ```
/// use distforge::mirror::published_artifact_filename;
///
/// assert_eq!(
///     published_artifact_filename("rust-std", "1.78.0", "x86_64-win7-windows-msvc", "abc123"),
///     "rust-std-1.78.0-x86_64-win7-windows-msvc-abc123.tar.xz"
/// );
/// ```
pub fn published_artifact_filename(
    component: &str,
    version: &str,
    triple: &str,
    hash: &str,
) -> String {
    format!("{}-{}-{}-{}.tar.xz", component, version, triple, hash)
}

/// Download URL for a published artifact.
///
/// The URL points into the dist server's `dist/custom/` directory, which is
/// where the synchronizer places the mirror's custom artifacts.
pub fn download_url(dist_server: &str, filename: &str) -> String {
    format!(
        "{}/dist/custom/{}",
        dist_server.trim_end_matches('/'),
        filename
    )
}
