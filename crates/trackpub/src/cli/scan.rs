//! Scan command: crawl and report without touching the output tree.
//!
//! Runs the identical pipeline as `publish` up to and including link-name
//! resolution, then renders the result instead of relinking. Useful for
//! previewing a new grouping pattern against a live tree.

use crate::cli::output;
use anyhow::Context;
use std::path::PathBuf;
use tracing::info;
use trackpub::config::PublishConfig;
use trackpub::pipeline;

#[derive(Debug)]
pub struct ScanArgs {
    pub config: PathBuf,
    pub json: bool,
    pub long: bool,
}

pub fn run(args: ScanArgs) -> anyhow::Result<()> {
    let config = PublishConfig::load(&args.config)?;
    info!(config = %args.config.display(), "dry-run scan");

    let plan = pipeline::plan(&config).context("scan run failed")?;
    output::render(&plan, args.json, args.long)
}
