//! Run diagnostics accumulator.
//!
//! Every pipeline stage appends here; nothing else formats a report. The
//! full struct is the long report, [`RunReport::summary`] is the short
//! counts-only view. Both serialize to JSON for downstream rendering.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A link-name collision: two distinct sources resolved to the same
/// public path. Last write wins; the report keeps both targets.
#[derive(Debug, Clone, Serialize)]
pub struct Collision {
    pub link: PathBuf,
    pub previous_target: PathBuf,
    pub new_target: PathBuf,
}

/// Traversal depth diagnostics. Informational only.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DepthStats {
    pub deepest_dir: usize,
    pub deepest_file: usize,
    pub shallowest_file: Option<usize>,
}

/// Append-only diagnostics for one crawl-to-publish run.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    /// Files visited by the scanner (post directory pruning).
    pub files_scanned: u64,
    /// Directories the scanner descended into.
    pub dirs_scanned: u64,
    /// Directories skipped by a prune rule (dotfile, scratch dir, or
    /// user glob); their subtrees were never entered.
    pub dirs_pruned: u64,
    /// Files skipped by a file-prune rule.
    pub files_ignored: u64,
    /// Groups with at least one displayable file.
    pub groups_displayed: u64,
    /// Files in the user-facing listing.
    pub files_displayed: u64,
    /// Symlinks published (data and index files).
    pub links_published: u64,

    /// Directories that could not be opened; their subtrees were skipped.
    pub unreadable_dirs: Vec<PathBuf>,
    /// Recurrence count of unreadable directories keyed by basename, to
    /// surface systematic per-name permission problems.
    pub unreadable_by_name: BTreeMap<String, u64>,
    /// Paths the grouping pattern did not match (fallback group).
    pub ungrouped_paths: Vec<PathBuf>,
    /// Data files excluded from the listing for lack of an index.
    pub missing_index: Vec<PathBuf>,
    /// Index files with no corresponding data file.
    pub orphan_indexes: Vec<PathBuf>,
    /// Link-name collisions (overwritten, never fatal).
    pub collisions: Vec<Collision>,
    /// Paths the display regex did not match (label fell back to path).
    pub unparseable_paths: Vec<PathBuf>,

    pub depth: DepthStats,
    /// Newest modification time seen across scanned files.
    pub newest_modified: Option<DateTime<Utc>>,
}

/// Counts-only view of a [`RunReport`].
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub files_scanned: u64,
    pub dirs_scanned: u64,
    pub dirs_pruned: u64,
    pub files_ignored: u64,
    pub groups_displayed: u64,
    pub files_displayed: u64,
    pub links_published: u64,
    pub unreadable_dirs: usize,
    pub ungrouped_paths: usize,
    pub missing_index: usize,
    pub orphan_indexes: usize,
    pub collisions: usize,
    pub unparseable_paths: usize,
    pub newest_modified: Option<DateTime<Utc>>,
}

impl RunReport {
    pub fn record_dir_scanned(&mut self, depth: usize) {
        self.dirs_scanned += 1;
        self.depth.deepest_dir = self.depth.deepest_dir.max(depth);
    }

    pub fn record_file_scanned(&mut self, depth: usize, modified: Option<DateTime<Utc>>) {
        self.files_scanned += 1;
        self.depth.deepest_file = self.depth.deepest_file.max(depth);
        self.depth.shallowest_file = Some(match self.depth.shallowest_file {
            Some(current) => current.min(depth),
            None => depth,
        });
        if let Some(modified) = modified {
            if self.newest_modified.map_or(true, |seen| modified > seen) {
                self.newest_modified = Some(modified);
            }
        }
    }

    pub fn record_dir_pruned(&mut self) {
        self.dirs_pruned += 1;
    }

    pub fn record_ignored_file(&mut self) {
        self.files_ignored += 1;
    }

    pub fn record_unreadable_dir(&mut self, dir: &Path) {
        if let Some(name) = dir.file_name().and_then(|n| n.to_str()) {
            *self.unreadable_by_name.entry(name.to_string()).or_insert(0) += 1;
        }
        self.unreadable_dirs.push(dir.to_path_buf());
    }

    pub fn record_ungrouped(&mut self, path: &Path) {
        self.ungrouped_paths.push(path.to_path_buf());
    }

    pub fn record_missing_index(&mut self, path: &Path) {
        self.missing_index.push(path.to_path_buf());
    }

    pub fn record_orphan_index(&mut self, path: &Path) {
        self.orphan_indexes.push(path.to_path_buf());
    }

    pub fn record_collision(&mut self, link: &Path, previous: &Path, new: &Path) {
        self.collisions.push(Collision {
            link: link.to_path_buf(),
            previous_target: previous.to_path_buf(),
            new_target: new.to_path_buf(),
        });
    }

    pub fn record_unparseable(&mut self, path: &Path) {
        self.unparseable_paths.push(path.to_path_buf());
    }

    /// Short, counts-only rendering.
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            files_scanned: self.files_scanned,
            dirs_scanned: self.dirs_scanned,
            dirs_pruned: self.dirs_pruned,
            files_ignored: self.files_ignored,
            groups_displayed: self.groups_displayed,
            files_displayed: self.files_displayed,
            links_published: self.links_published,
            unreadable_dirs: self.unreadable_dirs.len(),
            ungrouped_paths: self.ungrouped_paths.len(),
            missing_index: self.missing_index.len(),
            orphan_indexes: self.orphan_indexes.len(),
            collisions: self.collisions.len(),
            unparseable_paths: self.unparseable_paths.len(),
            newest_modified: self.newest_modified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn depth_and_mtime_tracking() {
        let mut report = RunReport::default();
        let older = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        report.record_file_scanned(3, Some(newer));
        report.record_file_scanned(1, Some(older));
        report.record_dir_scanned(5);

        assert_eq!(report.depth.deepest_file, 3);
        assert_eq!(report.depth.shallowest_file, Some(1));
        assert_eq!(report.depth.deepest_dir, 5);
        assert_eq!(report.newest_modified, Some(newer));
    }

    #[test]
    fn unreadable_dirs_counted_by_basename() {
        let mut report = RunReport::default();
        report.record_unreadable_dir(Path::new("/a/restricted"));
        report.record_unreadable_dir(Path::new("/b/restricted"));
        report.record_unreadable_dir(Path::new("/b/other"));

        assert_eq!(report.unreadable_dirs.len(), 3);
        assert_eq!(report.unreadable_by_name.get("restricted"), Some(&2));
        assert_eq!(report.unreadable_by_name.get("other"), Some(&1));
    }

    #[test]
    fn summary_reflects_list_lengths() {
        let mut report = RunReport::default();
        report.record_missing_index(Path::new("/d/a.bam"));
        report.record_collision(Path::new("g/f.bed"), Path::new("/x/a/f.bed"), Path::new("/x/b/f.bed"));

        let summary = report.summary();
        assert_eq!(summary.missing_index, 1);
        assert_eq!(summary.collisions, 1);
    }
}
