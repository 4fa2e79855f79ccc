//! trackpub launcher.
//!
//! Thin clap shell over the library: parse arguments, set up logging,
//! dispatch to the subcommand, map errors to a non-zero exit.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use trackpub_logging::{init_logging, LogOptions};

mod cli;

#[derive(Parser, Debug)]
#[command(
    name = "trackpub",
    version,
    about = "Crawl data trees and publish viewer-ready symlink listings"
)]
struct Cli {
    /// Mirror the log-file filter on stderr instead of warnings only
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl the configured roots and replace the published symlink tree
    Publish {
        /// Path to the run configuration
        #[arg(short, long, default_value = "trackpub.toml")]
        config: PathBuf,
        /// Emit the listing and report as JSON
        #[arg(long)]
        json: bool,
        /// Full report with path lists instead of counts only
        #[arg(long)]
        long: bool,
    },
    /// Crawl and report only; the filesystem is never mutated
    Scan {
        /// Path to the run configuration
        #[arg(short, long, default_value = "trackpub.toml")]
        config: PathBuf,
        /// Emit the listing and report as JSON
        #[arg(long)]
        json: bool,
        /// Full report with path lists instead of counts only
        #[arg(long)]
        long: bool,
    },
}

fn main() -> ExitCode {
    let args = Cli::parse();

    if let Err(err) = init_logging(LogOptions {
        app_name: "trackpub",
        verbose: args.verbose,
    }) {
        eprintln!("warning: logging setup failed: {err:#}");
    }

    let result = match args.command {
        Commands::Publish { config, json, long } => {
            cli::publish::run(cli::publish::PublishArgs { config, json, long })
        }
        Commands::Scan { config, json, long } => {
            cli::scan::run(cli::scan::ScanArgs { config, json, long })
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
