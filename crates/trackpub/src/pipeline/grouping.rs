//! Group assignment.
//!
//! The grouping pattern is applied once per kept file; the first capture
//! becomes the group id. Files the pattern does not match land in the
//! reserved fallback group, which sorts after every real group.

use super::capture::{PathCaptures, RegexCaptures};
use super::error::Result;
use super::report::RunReport;
use super::types::{FileRecord, GroupId};
use std::collections::BTreeMap;
use tracing::debug;

/// Compiled grouping pattern (regex with at least one capture group).
#[derive(Debug, Clone)]
pub struct GroupPattern {
    captures: RegexCaptures,
}

impl GroupPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            captures: RegexCaptures::new(pattern)?,
        })
    }

    /// Group id for a path: first capture, or `None` on no match.
    pub fn group_id(&self, record: &FileRecord) -> Option<GroupId> {
        self.captures
            .captures(&record.path)
            .and_then(|caps| caps.into_iter().next())
            .map(|capture| GroupId::from_capture(&capture))
    }
}

/// Bucket records into ordered groups. Membership is exclusive; each
/// record is evaluated exactly once.
pub fn assign_groups(
    records: Vec<FileRecord>,
    pattern: &GroupPattern,
    report: &mut RunReport,
) -> BTreeMap<GroupId, Vec<FileRecord>> {
    let mut groups: BTreeMap<GroupId, Vec<FileRecord>> = BTreeMap::new();
    for record in records {
        let group = match pattern.group_id(&record) {
            Some(group) => group,
            None => {
                debug!(path = %record.path.display(), "path not matched by grouping pattern");
                report.record_ungrouped(&record.path);
                GroupId::fallback()
            }
        };
        groups.entry(group).or_default().push(record);
    }
    for members in groups.values_mut() {
        members.sort_by(|a, b| a.path.cmp(&b.path));
    }
    groups
}
