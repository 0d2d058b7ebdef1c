//! `distforge publish` command.

use std::path::PathBuf;

use clap::Args;
use distforge::channel::Channel;
use distforge::mirror::{write_mirror_config, MirrorLayout};
use distforge::publish::{publish, PublishConfig};
use distforge::target::Target;

use crate::error::CliError;

/// Arguments for the publish command.
#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Mirror root directory
    #[arg(long, default_value = "mirror")]
    pub mirror_dir: PathBuf,

    /// Directory holding the build driver's dist output
    #[arg(long, default_value = "rust/build/dist")]
    pub build_dist_dir: PathBuf,

    /// Version to publish (version number, nightly date or commit)
    #[arg(long)]
    pub version: String,

    /// Release channel
    #[arg(long, default_value = "dev")]
    pub channel: String,

    /// Target to publish; repeatable, defaults to all known targets
    #[arg(long = "target")]
    pub targets: Vec<String>,

    /// Dist server base URL used in manifest download links
    #[arg(long)]
    pub dist_server: Option<String>,

    /// Skip writing the mirror pin configuration
    #[arg(long)]
    pub no_mirror_config: bool,
}

/// Run the publish command.
pub fn run(args: PublishArgs) -> Result<(), CliError> {
    let channel: Channel = args.channel.parse().map_err(CliError::Usage)?;
    let targets = resolve_targets(&args.targets)?;
    let layout = MirrorLayout::new(&args.mirror_dir);

    if !args.no_mirror_config {
        write_mirror_config(&layout, channel, &args.version)?;
    }

    let mut config = PublishConfig::default();
    if let Some(url) = args.dist_server {
        config = config.with_dist_server(url);
    }

    let report = publish(
        &layout,
        &args.build_dist_dir,
        &targets,
        channel,
        &args.version,
        &config,
    )?;

    for artifact in &report.artifacts {
        println!("published {} as {}", artifact.target, artifact.filename);
    }
    println!(
        "manifest {} updated ({} targets, {} new extension entries)",
        report.manifest_path.display(),
        report.patch.targets_registered,
        report.patch.extensions_added
    );
    println!("manifest sha256: {}", report.manifest_hash);

    Ok(())
}

/// Resolve target short names, defaulting to all known targets.
fn resolve_targets(names: &[String]) -> Result<Vec<&'static Target>, CliError> {
    if names.is_empty() {
        return Ok(Target::all().iter().collect());
    }

    names
        .iter()
        .map(|name| {
            Target::from_name(name).ok_or_else(|| {
                CliError::Usage(format!(
                    "unknown target `{}` (known targets: {})",
                    name,
                    Target::known_names().join(", ")
                ))
            })
        })
        .collect()
}
