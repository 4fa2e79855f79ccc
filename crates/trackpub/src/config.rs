//! Run configuration.
//!
//! One TOML file describes a publish run; CLI flags may override
//! individual fields after loading. All validation beyond shape (regex
//! compilation, glob compilation, link-dir safety) happens in the
//! pipeline before any traversal.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

fn default_display_mode() -> String {
    "nameonly".to_string()
}

/// Everything a crawl-to-publish run needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    /// Absolute directories to crawl.
    pub scan_roots: Vec<PathBuf>,
    /// Basename globs for directories never descended into.
    #[serde(default)]
    pub prune_dirs: Vec<String>,
    /// Basename globs for files skipped during the walk.
    #[serde(default)]
    pub prune_files: Vec<String>,
    /// Grouping regex; the first capture becomes the group id.
    pub group_pattern: String,
    /// `nameonly` | `fullpath` | `regex:<pattern>`.
    #[serde(default = "default_display_mode")]
    pub display_mode: String,
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Output root for the published symlink tree; must look like
    /// `<public-root>/<project>/links`.
    pub link_dir: PathBuf,
}

impl PublishConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}
