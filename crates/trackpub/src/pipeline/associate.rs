//! Data-file / index-file association.
//!
//! Within one group, a data file is displayable when a companion index
//! under any of its pairing conventions is present, or when its format
//! needs no index at all. Implemented as a plain expected-path lookup:
//! for every data file and pairing convention, compute the expected index
//! path by suffix swap and probe the set of index files actually found.

use super::formats::{index_rules_for, FormatKind};
use super::report::RunReport;
use super::types::FileRecord;
use std::collections::{HashMap, HashSet};

/// Case-normalized lookup key for a record: lowercased stem plus the
/// (already lowercase) matched extension.
fn record_key(record: &FileRecord) -> String {
    let mut key = record.stem().to_ascii_lowercase();
    key.push_str(record.format.extension);
    key
}

fn expected_index_key(data: &FileRecord, index_ext: &str) -> String {
    let mut key = data.stem().to_ascii_lowercase();
    key.push_str(index_ext);
    key
}

/// Return the displayable subset of one group, sorted by path.
///
/// Appends to the report: data files whose every pairing convention came
/// up empty (`missing_index`), and index files no data file expected
/// (`orphan_indexes`).
pub fn displayable_files(group: &[FileRecord], report: &mut RunReport) -> Vec<FileRecord> {
    let index_keys: HashMap<String, &FileRecord> = group
        .iter()
        .filter(|record| record.format.kind == FormatKind::Index)
        .map(|record| (record_key(record), record))
        .collect();

    let mut displayable = Vec::new();
    let mut claimed_indexes: HashSet<String> = HashSet::new();

    for record in group {
        match record.format.kind {
            FormatKind::StandaloneData => displayable.push(record.clone()),
            FormatKind::IndexedData => {
                let mut confirmed = false;
                if let Some(rule) = index_rules_for(record.format.extension) {
                    for index_ext in rule.index_exts {
                        let expected = expected_index_key(record, index_ext);
                        if index_keys.contains_key(&expected) {
                            claimed_indexes.insert(expected);
                            confirmed = true;
                        }
                    }
                }
                if confirmed {
                    displayable.push(record.clone());
                } else {
                    report.record_missing_index(&record.path);
                }
            }
            FormatKind::Index => {}
        }
    }

    // Sorted so the orphan list is stable across runs.
    let mut orphans: Vec<&FileRecord> = index_keys
        .iter()
        .filter(|(key, _)| !claimed_indexes.contains(*key))
        .map(|(_, record)| *record)
        .collect();
    orphans.sort_by(|a, b| a.path.cmp(&b.path));
    for record in orphans {
        report.record_orphan_index(&record.path);
    }

    displayable.sort_by(|a, b| a.path.cmp(&b.path));
    displayable.dedup_by(|a, b| a.path == b.path);
    displayable
}
