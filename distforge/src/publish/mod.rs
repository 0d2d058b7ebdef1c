//! Artifact publisher.
//!
//! Publishing takes externally built dist archives and registers them in
//! the mirror:
//! 1. Stage every target's build output into the mirror's custom artifact
//!    directory under its hash-qualified name (missing outputs abort here,
//!    before the manifest is touched)
//! 2. Load the channel manifest
//! 3. Register availability records and umbrella extension entries
//! 4. Persist the manifest with checksum sidecar and hash-named backup

mod artifacts;
mod error;

pub use artifacts::{stage_artifact, PublishedArtifact};
pub use error::{PublishError, PublishResult};

use std::path::{Path, PathBuf};

use tracing::info;

use crate::buildenv::{BuildDriver, BuildEnv};
use crate::channel::Channel;
use crate::manifest::{
    persist_manifest, register_artifacts, ArtifactRecord, ChannelManifest, PatchSummary,
    STD_COMPONENT, UMBRELLA_PACKAGE,
};
use crate::mirror::{download_url, MirrorLayout};
use crate::target::Target;

/// Dist server custom artifacts are served from by default.
pub const DEFAULT_DIST_SERVER: &str = "https://static.rust-lang.org";

/// Configuration for a publish run.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Component package being published.
    pub component: String,

    /// Umbrella package whose hosts reference the component.
    pub umbrella: String,

    /// Base URL of the dist server artifacts are downloaded from.
    pub dist_server: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            component: STD_COMPONENT.to_string(),
            umbrella: UMBRELLA_PACKAGE.to_string(),
            dist_server: DEFAULT_DIST_SERVER.to_string(),
        }
    }
}

impl PublishConfig {
    /// Set the dist server base URL.
    pub fn with_dist_server(mut self, url: impl Into<String>) -> Self {
        self.dist_server = url.into();
        self
    }

    /// Set the component package name.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = component.into();
        self
    }
}

/// Result of a publish run.
#[derive(Debug, Clone)]
pub struct PublishReport {
    /// Artifacts staged into the mirror.
    pub artifacts: Vec<PublishedArtifact>,

    /// Path of the patched channel manifest.
    pub manifest_path: PathBuf,

    /// SHA-256 hash of the persisted manifest.
    pub manifest_hash: String,

    /// What the registration pass changed.
    pub patch: PatchSummary,
}

/// Run the external build driver for each target.
///
/// Each target gets its own immutable [`BuildEnv`]; failures abort the
/// remaining builds.
pub fn run_builds(
    driver: &dyn BuildDriver,
    rust_repo: &Path,
    sdk_dir: &Path,
    targets: &[&Target],
) -> PublishResult<()> {
    for target in targets {
        let env = BuildEnv::for_target(rust_repo, sdk_dir, target);
        info!(triple = %target.rust_target, "running dist build");
        driver.dist(&env, target)?;
    }
    Ok(())
}

/// Publish built artifacts for the given targets into the mirror.
///
/// # Arguments
///
/// * `layout` - Mirror directory layout
/// * `build_dist_dir` - Directory holding the build driver's dist output
/// * `targets` - Targets to publish
/// * `channel` - Release channel
/// * `version` - Version being published
/// * `config` - Publish configuration
///
/// # Errors
///
/// Missing build outputs and unreadable artifacts fail before the manifest
/// is loaded; an unparseable manifest fails before any mutation.
pub fn publish(
    layout: &MirrorLayout,
    build_dist_dir: &Path,
    targets: &[&Target],
    channel: Channel,
    version: &str,
    config: &PublishConfig,
) -> PublishResult<PublishReport> {
    let dist_version = channel.dist_version(version);
    let custom_dir = layout.custom_dir();

    // Stage everything first so a missing artifact aborts with the
    // manifest untouched.
    let mut staged = Vec::with_capacity(targets.len());
    for target in targets {
        staged.push(stage_artifact(
            build_dist_dir,
            &custom_dir,
            &config.component,
            dist_version,
            version,
            target,
        )?);
    }

    let manifest_path = layout.manifest_path(channel, version);
    let mut manifest = ChannelManifest::load(&manifest_path)?;

    let records: Vec<ArtifactRecord> = staged
        .iter()
        .map(|a| ArtifactRecord {
            target: a.target.clone(),
            url: download_url(&config.dist_server, &a.filename),
            hash: a.hash.clone(),
        })
        .collect();

    let patch = register_artifacts(&mut manifest, &config.component, &config.umbrella, &records);
    let receipt = persist_manifest(&manifest, &manifest_path)?;

    info!(
        manifest = %manifest_path.display(),
        hash = %receipt.manifest_hash,
        targets = staged.len(),
        extensions = patch.extensions_added,
        "published targets into channel manifest"
    );

    Ok(PublishReport {
        artifacts: staged,
        manifest_path,
        manifest_hash: receipt.manifest_hash,
        patch,
    })
}
