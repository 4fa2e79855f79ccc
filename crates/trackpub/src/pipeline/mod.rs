//! Crawl-to-publish pipeline.
//!
//! Stages run strictly in order: scan, classify, group, associate,
//! resolve link names, derive labels. [`plan`] computes the whole result
//! in memory without touching the output tree; [`publish`] runs the same
//! plan and then replaces the symlink tree. Every partially-failing stage
//! appends to the shared [`RunReport`].

pub mod associate;
pub mod capture;
pub mod display;
pub mod error;
pub mod formats;
pub mod grouping;
pub mod linker;
pub mod report;
pub mod scanner;
pub mod types;

pub use display::DisplayMode;
pub use error::{PipelineError, Result};
pub use grouping::GroupPattern;
pub use report::{ReportSummary, RunReport};
pub use scanner::Scanner;
pub use types::{FileRecord, GroupId, GroupListing, ListedFile};

use crate::config::PublishConfig;
use scanner::RawFile;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// The fully computed result of one run: the user-facing listing, the
/// complete link map, and the diagnostics gathered along the way.
#[derive(Debug)]
pub struct PublishPlan {
    /// Ordered listing of groups with at least one displayable file.
    pub listing: Vec<GroupListing>,
    /// Every symlink to publish: relative public path -> absolute source.
    /// Includes index files and data files missing their index.
    pub links: BTreeMap<PathBuf, PathBuf>,
    pub report: RunReport,
}

/// Compute the full publish plan without mutating the filesystem.
pub fn plan(config: &PublishConfig) -> Result<PublishPlan> {
    // Validate everything fatal up front, before any traversal.
    let display = DisplayMode::parse(&config.display_mode)?;
    let pattern = GroupPattern::new(&config.group_pattern)?;
    if !linker::link_dir_is_safe(&config.link_dir) {
        return Err(PipelineError::UnsafeLinkDir(config.link_dir.clone()));
    }
    let scanner = Scanner::new(&config.prune_dirs, &config.prune_files, config.follow_symlinks)?;

    let mut report = RunReport::default();
    let raw = scanner.scan(&config.scan_roots, &mut report)?;
    let records = classify_files(raw);
    debug!(kept = records.len(), "classified scan results");

    let groups = grouping::assign_groups(records, &pattern, &mut report);
    let links = linker::resolve_links(&groups, &mut report);

    let mut listing = Vec::new();
    for (group, members) in &groups {
        let displayable = associate::displayable_files(members, &mut report);
        if displayable.is_empty() {
            continue;
        }
        let files: Vec<ListedFile> = displayable
            .iter()
            .map(|record| ListedFile {
                link: linker::link_name(record, group),
                label: display.label(&record.path, &mut report),
            })
            .collect();
        report.groups_displayed += 1;
        report.files_displayed += files.len() as u64;
        listing.push(GroupListing {
            group: group.clone(),
            files,
        });
    }

    info!(
        files_scanned = report.files_scanned,
        groups = report.groups_displayed,
        files_displayed = report.files_displayed,
        links = links.len(),
        "plan computed"
    );
    Ok(PublishPlan {
        listing,
        links,
        report,
    })
}

/// Compute the plan, then replace the symlink tree under the configured
/// output root.
pub fn publish(config: &PublishConfig) -> Result<PublishPlan> {
    let mut plan = plan(config)?;
    linker::publish_links(&config.link_dir, &plan.links, &mut plan.report)?;
    Ok(plan)
}

/// Apply the allow-list: unlisted extensions and zero-byte files are
/// dropped silently.
fn classify_files(raw: Vec<RawFile>) -> Vec<FileRecord> {
    raw.into_iter()
        .filter_map(|file| {
            if file.size_bytes == 0 {
                return None;
            }
            let format = formats::classify(&file.path)?;
            Some(FileRecord {
                path: file.path,
                format,
                size_bytes: file.size_bytes,
                modified: file.modified,
                root: file.root,
            })
        })
        .collect()
}
