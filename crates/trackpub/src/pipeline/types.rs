//! Core types for the publish pipeline

use super::formats::FileFormat;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Reserved group for paths the grouping pattern did not match.
///
/// The `~` prefix sorts after every ASCII-alphanumeric capture value, so
/// the fallback group always comes last in ordered listings.
pub const FALLBACK_GROUP: &str = "~ungrouped";

/// Identifier of a file group: the first capture of the grouping pattern,
/// or the reserved fallback id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupId(String);

impl GroupId {
    /// Build a group id from a capture value. Path separators are folded
    /// to `_` because the id becomes a single directory name in the
    /// output tree.
    pub fn from_capture(capture: &str) -> Self {
        let cleaned: String = capture
            .chars()
            .map(|ch| if ch == '/' || ch == '\\' { '_' } else { ch })
            .collect();
        Self(cleaned)
    }

    pub fn fallback() -> Self {
        Self(FALLBACK_GROUP.to_string())
    }

    pub fn is_fallback(&self) -> bool {
        self.0 == FALLBACK_GROUP
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file kept by the classifier. Immutable once created; the group is
/// assigned exactly once by the group assigner.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Absolute source path.
    pub path: PathBuf,
    /// The allow-list entry that matched.
    pub format: &'static FileFormat,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
    /// Scan root this file was found under.
    pub root: PathBuf,
}

impl FileRecord {
    /// Path string with the matched extension suffix removed, keeping the
    /// trailing dot (`/d/a.bam` -> `/d/a.`). Swapping suffixes on this
    /// stem yields expected companion paths.
    pub fn stem(&self) -> &str {
        let path = self.path.to_str().unwrap_or_default();
        &path[..path.len().saturating_sub(self.format.extension.len())]
    }
}

/// A displayable file as it appears in the user-facing listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListedFile {
    /// Link location relative to the output root.
    pub link: PathBuf,
    /// Human-readable label derived by the display formatter.
    pub label: String,
}

/// One group of the final listing. Groups with no displayable files are
/// omitted entirely.
#[derive(Debug, Clone, Serialize)]
pub struct GroupListing {
    pub group: GroupId,
    pub files: Vec<ListedFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_sorts_after_real_ids() {
        let mut ids = vec![
            GroupId::fallback(),
            GroupId::from_capture("sample_9"),
            GroupId::from_capture("ZZZ"),
            GroupId::from_capture("patient-1"),
        ];
        ids.sort();
        assert!(ids.last().unwrap().is_fallback());
    }

    #[test]
    fn capture_with_separator_becomes_flat_id() {
        let id = GroupId::from_capture("run1/sampleA");
        assert_eq!(id.as_str(), "run1_sampleA");
    }
}
