//! Publish command: full crawl-to-publish run.

use crate::cli::output;
use anyhow::Context;
use std::path::PathBuf;
use tracing::info;
use trackpub::config::PublishConfig;
use trackpub::pipeline;

#[derive(Debug)]
pub struct PublishArgs {
    pub config: PathBuf,
    pub json: bool,
    pub long: bool,
}

pub fn run(args: PublishArgs) -> anyhow::Result<()> {
    let config = PublishConfig::load(&args.config)?;
    info!(config = %args.config.display(), link_dir = %config.link_dir.display(), "publishing");

    let plan = pipeline::publish(&config).context("publish run failed")?;
    output::render(&plan, args.json, args.long)
}
