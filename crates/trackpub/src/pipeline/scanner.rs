//! Filesystem scanner.
//!
//! Sequential depth-first walk over the scan roots, built on `walkdir`.
//! One unreadable directory never aborts the run: its subtree is skipped
//! and the path is recorded in the report, with a per-basename recurrence
//! count so that systematic permission problems stand out. Entries are
//! visited in sorted order so repeated runs over an unchanged tree
//! produce identical output.

use super::error::{PipelineError, Result};
use super::report::RunReport;
use chrono::{DateTime, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Name of the scratch directory trackpub itself may leave inside a
/// tree; never descended into.
pub const WORK_DIR_NAME: &str = "trackpub_work";

/// A file reported by the scanner, before classification.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
    /// The scan root this file was found under.
    pub root: PathBuf,
}

/// Physical identity of a file, used to keep a single hit when the same
/// file is reachable through overlapping symlink targets. Ancestor-loop
/// cycles are already caught by the walker itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Identity {
    #[cfg(unix)]
    DevIno(u64, u64),
    Canonical(PathBuf),
}

fn identity(path: &Path, metadata: &Metadata) -> Identity {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let _ = path;
        return Identity::DevIno(metadata.dev(), metadata.ino());
    }
    #[cfg(not(unix))]
    {
        let _ = metadata;
        Identity::Canonical(fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
    }
}

/// Depth-first scanner with prune rules and optional symlink following.
pub struct Scanner {
    dir_prunes: GlobSet,
    file_prunes: GlobSet,
    follow_symlinks: bool,
}

impl Scanner {
    pub fn new(
        prune_dirs: &[String],
        prune_files: &[String],
        follow_symlinks: bool,
    ) -> Result<Self> {
        Ok(Self {
            dir_prunes: compile_globs(prune_dirs)?,
            file_prunes: compile_globs(prune_files)?,
            follow_symlinks,
        })
    }

    /// Walk all scan roots and return every kept leaf file.
    ///
    /// Fatal only before traversal: an empty root list or a relative
    /// root. Everything else is recorded in the report and skipped.
    pub fn scan(&self, roots: &[PathBuf], report: &mut RunReport) -> Result<Vec<RawFile>> {
        if roots.is_empty() {
            return Err(PipelineError::NoScanRoots);
        }
        for root in roots {
            if !root.is_absolute() {
                return Err(PipelineError::RelativeScanRoot(root.clone()));
            }
        }

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for root in roots {
            debug!(root = %root.display(), "scanning root");
            self.walk_root(root, &mut seen, &mut files, report);
        }
        Ok(files)
    }

    fn walk_root(
        &self,
        root: &Path,
        seen: &mut HashSet<Identity>,
        out: &mut Vec<RawFile>,
        report: &mut RunReport,
    ) {
        let mut walker = WalkDir::new(root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    note_walk_error(err, report);
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry.file_type();

            if file_type.is_dir() {
                // The root itself is never pruned, only its descendants.
                if entry.depth() > 0 && self.prune_dir(&name) {
                    report.record_dir_pruned();
                    walker.skip_current_dir();
                    continue;
                }
                report.record_dir_scanned(entry.depth());
                continue;
            }

            // With follow_links off, symlinks surface as symlinks and
            // are skipped; with it on, they carry the target's type.
            if !file_type.is_file() {
                continue;
            }

            if self.file_prunes.is_match(name.as_str()) {
                report.record_ignored_file();
                continue;
            }
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(_) => continue,
            };
            if self.follow_symlinks {
                // Overlapping symlink targets: same physical file
                // reached twice, keep the first hit.
                if !seen.insert(identity(entry.path(), &metadata)) {
                    continue;
                }
            }

            let modified = metadata
                .modified()
                .unwrap_or(SystemTime::UNIX_EPOCH)
                .into();
            report.record_file_scanned(entry.depth(), Some(modified));
            out.push(RawFile {
                path: entry.into_path(),
                size_bytes: metadata.len(),
                modified,
                root: root.to_path_buf(),
            });
        }
    }

    /// Dotfile directories, the internal scratch directory, and
    /// user-supplied directory prune globs are never descended into.
    fn prune_dir(&self, name: &str) -> bool {
        name.starts_with('.') || name == WORK_DIR_NAME || self.dir_prunes.is_match(name)
    }
}

fn note_walk_error(err: walkdir::Error, report: &mut RunReport) {
    if err.loop_ancestor().is_some() {
        debug!(error = %err, "symlink cycle detected, not re-entering");
        return;
    }
    let Some(path) = err.path() else {
        return;
    };
    // A dangling symlink target surfaces as a walk error when following;
    // it is not an unreadable directory.
    if fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
    {
        debug!(path = %path.display(), "broken symlink, skipping");
        return;
    }
    warn!(dir = %path.display(), error = %err, "unreadable directory, skipping subtree");
    report.record_unreadable_dir(path);
}

fn compile_globs(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| PipelineError::InvalidPruneGlob {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| PipelineError::InvalidPruneGlob {
            pattern: String::new(),
            message: e.to_string(),
        })
}
