//! Distforge CLI - command-line interface
//!
//! Thin front end over the distforge library: argument parsing, logging
//! setup and console output live here; all publishing and synchronization
//! logic lives in the library.

mod commands;
mod error;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "distforge", version, about = "Publish custom toolchain builds into a release mirror and sync it to object storage")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Publish built artifacts into the mirror and patch the channel manifest
    Publish(commands::publish::PublishArgs),

    /// Synchronize the mirror directory to remote object storage
    Sync(commands::sync::SyncArgs),
}

fn main() {
    let cli = Cli::parse();
    distforge::log::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Publish(args) => commands::publish::run(args),
        Commands::Sync(args) => commands::sync::run(args),
    };

    if let Err(err) = result {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
