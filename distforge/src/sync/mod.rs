//! Mirror synchronizer.
//!
//! Makes the remote object store match the local mirror tree, file by
//! file, using content hashes as the sole equality criterion. The walk
//! and all remote calls are sequential and blocking; one file's metadata
//! query and (conditional) upload complete before the next file is
//! considered.
//!
//! A run over an already-synchronized tree performs zero uploads. A
//! conflict aborts the whole run without rolling back earlier uploads:
//! every uploaded object carries verifiable hash metadata, so a partial
//! run is always safely resumable and rollback would add complexity
//! without correctness benefit.

mod decision;
mod error;
mod remote;
mod walk;

pub use decision::{classify, SyncDecision};
pub use error::{SyncError, SyncResult};
pub use remote::{RemoteStore, S3RemoteStore, HASH_METADATA_KEY};
pub use walk::{scan_mirror, MirrorEntry};

use std::path::Path;

use tracing::{debug, info, warn};

use crate::digest::file_digest;

/// Progress callback for synchronization.
///
/// # Arguments
///
/// * `processed` - Files handled so far (monotonically advancing)
/// * `total` - Total file count from the initial scan
/// * `key` - Key of the file just handled
pub type SyncProgressCallback = Box<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Options for a synchronization run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Report intended actions without transferring data.
    pub dry_run: bool,

    /// Authorize overwriting remote objects whose content differs.
    /// Never implied by `dry_run`.
    pub force: bool,
}

impl SyncOptions {
    /// Default options: live mode, no overwrites.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Authorize overwrites for this run.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Decision recorded for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Remote object key.
    pub key: String,

    /// What was decided (and, in live mode, done).
    pub decision: SyncDecision,
}

/// Result of a completed synchronization run.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Total files discovered by the initial scan.
    pub total: usize,

    /// Files whose remote content already matched.
    pub skipped: usize,

    /// Files classified as new.
    pub new_files: usize,

    /// Files classified as modified (force runs only).
    pub modified: usize,

    /// Files actually transferred. Zero in dry-run mode.
    pub uploaded: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,

    /// Per-file decisions, in processing order.
    pub outcomes: Vec<FileOutcome>,
}

/// Sequential mirror-to-remote synchronizer.
pub struct Synchronizer<'a, S: RemoteStore + ?Sized> {
    store: &'a S,
    options: SyncOptions,
}

impl<'a, S: RemoteStore + ?Sized> Synchronizer<'a, S> {
    /// Create a synchronizer over a remote store.
    pub fn new(store: &'a S, options: SyncOptions) -> Self {
        Self { store, options }
    }

    /// Synchronize the mirror tree rooted at `mirror_root`.
    ///
    /// Files are processed in sorted key order. The first conflict aborts
    /// the run with [`SyncError::Conflict`]; files enumerated after it are
    /// never queried or uploaded.
    ///
    /// # Arguments
    ///
    /// * `mirror_root` - Local mirror root directory
    /// * `progress` - Optional progress callback
    pub fn run(
        &self,
        mirror_root: &Path,
        progress: Option<&SyncProgressCallback>,
    ) -> SyncResult<SyncReport> {
        let entries = scan_mirror(mirror_root)?;
        let total = entries.len();

        info!(
            total,
            dry_run = self.options.dry_run,
            force = self.options.force,
            "synchronizing mirror"
        );

        let mut report = SyncReport {
            total,
            dry_run: self.options.dry_run,
            ..Default::default()
        };

        for (index, entry) in entries.iter().enumerate() {
            let remote_hash = self.store.head(&entry.key)?;
            let local_hash = file_digest(&entry.path).map_err(|e| SyncError::ReadFailed {
                path: entry.path.clone(),
                source: e,
            })?;

            let decision = classify(&local_hash, remote_hash.as_deref(), self.options.force);

            match decision {
                SyncDecision::Skip => {
                    debug!(key = %entry.key, "remote content matches");
                    report.skipped += 1;
                }
                SyncDecision::Conflict => {
                    warn!(key = %entry.key, "remote content differs, aborting");
                    return Err(SyncError::Conflict {
                        key: entry.key.clone(),
                        local_hash,
                        remote_hash: remote_hash.unwrap_or_default(),
                    });
                }
                SyncDecision::New | SyncDecision::Modify => {
                    if decision == SyncDecision::New {
                        report.new_files += 1;
                    } else {
                        report.modified += 1;
                    }

                    if self.options.dry_run {
                        info!(key = %entry.key, action = decision.label(), "would upload");
                    } else {
                        self.store.upload(&entry.key, &entry.path, &local_hash)?;
                        report.uploaded += 1;
                        info!(key = %entry.key, action = decision.label(), "uploaded");
                    }
                }
            }

            report.outcomes.push(FileOutcome {
                key: entry.key.clone(),
                decision,
            });

            if let Some(cb) = progress {
                cb(index + 1, total, &entry.key);
            }
        }

        Ok(report)
    }
}
