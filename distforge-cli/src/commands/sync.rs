//! `distforge sync` command.
//!
//! Dry-run is the default; `--upload` performs the transfers. A conflict
//! aborts with a failure exit so the operator can inspect the path and
//! re-run with `--force` if the overwrite is intended.

use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use distforge::sync::{S3RemoteStore, SyncDecision, SyncOptions, SyncProgressCallback, Synchronizer};

use crate::error::CliError;

/// Arguments for the sync command.
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Mirror root directory
    #[arg(long, default_value = "mirror")]
    pub mirror_dir: PathBuf,

    /// Bucket to upload to
    #[arg(long)]
    pub bucket: String,

    /// Endpoint URL of the S3-compatible server
    #[arg(long)]
    pub s3_url: Option<String>,

    /// Region of the bucket
    #[arg(long)]
    pub region: Option<String>,

    /// Actually perform the uploads; without this flag the run only
    /// reports what it would transfer
    #[arg(long)]
    pub upload: bool,

    /// Overwrite remote objects whose content differs
    #[arg(long)]
    pub force: bool,
}

/// Run the sync command.
pub fn run(args: SyncArgs) -> Result<(), CliError> {
    let mut store = S3RemoteStore::new(&args.bucket);
    if let Some(url) = &args.s3_url {
        store = store.with_endpoint_url(url);
    }
    if let Some(region) = &args.region {
        store = store.with_region(region);
    }

    let options = SyncOptions::new()
        .with_dry_run(!args.upload)
        .with_force(args.force);

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{pos}/{len} {wide_msg}")
            .expect("valid progress template"),
    );
    let progress_bar = bar.clone();
    let progress: SyncProgressCallback = Box::new(move |processed, total, key| {
        progress_bar.set_length(total as u64);
        progress_bar.set_position(processed as u64);
        progress_bar.set_message(key.to_string());
    });

    let report = Synchronizer::new(&store, options).run(&args.mirror_dir, Some(&progress))?;
    bar.finish_and_clear();

    if report.dry_run {
        for outcome in &report.outcomes {
            match outcome.decision {
                SyncDecision::New => println!("would upload new file - {}", outcome.key),
                SyncDecision::Modify => println!("would modify file     - {}", outcome.key),
                SyncDecision::Skip | SyncDecision::Conflict => {}
            }
        }
        println!(
            "dry run: {} new, {} modified, {} unchanged of {} files",
            report.new_files, report.modified, report.skipped, report.total
        );
        if report.new_files + report.modified > 0 {
            println!("re-run with --upload to perform the transfers");
        }
    } else {
        println!(
            "uploaded {} of {} files ({} unchanged)",
            report.uploaded, report.total, report.skipped
        );
    }

    Ok(())
}
