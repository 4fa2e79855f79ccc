//! Public link-name resolution and symlink publishing.
//!
//! Every kept file gets a deterministic relative path under the output
//! root: `<group>/<joined-intermediate-dirs>/<basename>`. The basename is
//! preserved because it is the label a remote-controlled viewer shows;
//! the directory components between the scan root and the file collapse
//! into one `_`-joined segment so the published tree stays shallow.
//! Collisions are recorded and overwritten, last write wins.
//!
//! Publishing is destructive but bounded: the complete link map is
//! computed before anything is removed, the clear step only ever deletes
//! symlinks and then-empty directories, and it refuses to run against a
//! path that does not look like `<public-root>/<project>/links`.

use super::error::{PipelineError, Result};
use super::report::RunReport;
use super::types::{FileRecord, GroupId};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Marker segment the destructive-clear step requires in the output path.
const LINK_MARKER_SEGMENT: &str = "links";

/// Structural safety check for the output directory: an absolute
/// `<public-root>/<project>/links` path, so a misconfiguration can never
/// point the clear step at unrelated filesystem content.
pub fn link_dir_is_safe(link_dir: &Path) -> bool {
    if !link_dir.is_absolute() {
        return false;
    }
    let normals: Vec<&str> = link_dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    normals.len() >= 3 && normals.last() == Some(&LINK_MARKER_SEGMENT)
}

/// Derive the relative public path for one record.
pub fn link_name(record: &FileRecord, group: &GroupId) -> PathBuf {
    let rel = record
        .path
        .strip_prefix(&record.root)
        .unwrap_or(&record.path);
    let basename = rel
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let intermediate: Vec<String> = rel
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let mut link = PathBuf::from(group.as_str());
    if !intermediate.is_empty() {
        link.push(intermediate.join("_"));
    }
    link.push(basename);
    link
}

/// Resolve the full link map for all groups: relative public path ->
/// original absolute source. Collisions are recorded; the later record
/// wins.
pub fn resolve_links(
    groups: &BTreeMap<GroupId, Vec<FileRecord>>,
    report: &mut RunReport,
) -> BTreeMap<PathBuf, PathBuf> {
    let mut links: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();
    for (group, members) in groups {
        for record in members {
            let link = link_name(record, group);
            if let Some(previous) = links.get(&link) {
                if previous != &record.path {
                    warn!(
                        link = %link.display(),
                        previous = %previous.display(),
                        new = %record.path.display(),
                        "link name collision, overwriting"
                    );
                    report.record_collision(&link, previous, &record.path);
                }
            }
            links.insert(link, record.path.clone());
        }
    }
    links
}

/// Replace the published tree under `link_dir` with the given link map.
///
/// The map must be fully computed before this is called; the window of
/// user-visible inconsistency is just the clear + relink below.
pub fn publish_links(
    link_dir: &Path,
    links: &BTreeMap<PathBuf, PathBuf>,
    report: &mut RunReport,
) -> Result<()> {
    if !link_dir_is_safe(link_dir) {
        return Err(PipelineError::UnsafeLinkDir(link_dir.to_path_buf()));
    }

    clear_links(link_dir)?;
    fs::create_dir_all(link_dir)?;

    for (link, target) in links {
        let location = link_dir.join(link);
        if let Some(parent) = location.parent() {
            fs::create_dir_all(parent)?;
        }
        if fs::symlink_metadata(&location).is_ok() {
            fs::remove_file(&location)?;
        }
        symlink(target, &location)?;
        report.links_published += 1;
        debug!(link = %location.display(), target = %target.display(), "published");
    }

    info!(
        links = report.links_published,
        dir = %link_dir.display(),
        "publish complete"
    );
    Ok(())
}

/// Remove all symlinks and then-empty directories under `link_dir`.
/// Regular files are never deleted, and directories still holding any
/// are left in place.
fn clear_links(link_dir: &Path) -> Result<()> {
    if !link_dir_is_safe(link_dir) {
        return Err(PipelineError::UnsafeLinkDir(link_dir.to_path_buf()));
    }
    if !link_dir.exists() {
        return Ok(());
    }
    clear_tree(link_dir)?;
    Ok(())
}

fn clear_tree(dir: &Path) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = fs::symlink_metadata(&path)?;
        if metadata.file_type().is_symlink() {
            fs::remove_file(&path)?;
        } else if metadata.is_dir() {
            clear_tree(&path)?;
            // Fails while the directory still holds regular files;
            // that is intentional.
            let _ = fs::remove_dir(&path);
        }
    }
    Ok(())
}

#[cfg(unix)]
fn symlink(target: &Path, location: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, location)
}

#[cfg(windows)]
fn symlink(target: &Path, location: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, location)
}
