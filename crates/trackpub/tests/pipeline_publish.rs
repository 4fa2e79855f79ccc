//! End-to-end pipeline tests over real temporary trees.

use filetime::{set_file_mtime, FileTime};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use trackpub::config::PublishConfig;
use trackpub::pipeline::{self, PipelineError};

fn touch(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(&path).unwrap().write_all(b"data").unwrap();
    path
}

fn config(roots: Vec<PathBuf>, link_dir: PathBuf, group_pattern: &str) -> PublishConfig {
    PublishConfig {
        scan_roots: roots,
        prune_dirs: Vec::new(),
        prune_files: Vec::new(),
        group_pattern: group_pattern.to_string(),
        display_mode: "nameonly".to_string(),
        follow_symlinks: false,
        link_dir,
    }
}

fn collect_links(link_dir: &Path) -> Vec<(PathBuf, PathBuf)> {
    fn walk(dir: &Path, base: &Path, out: &mut Vec<(PathBuf, PathBuf)>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            let metadata = fs::symlink_metadata(&path).unwrap();
            if metadata.file_type().is_symlink() {
                let rel = path.strip_prefix(base).unwrap().to_path_buf();
                out.push((rel, fs::read_link(&path).unwrap()));
            } else if metadata.is_dir() {
                walk(&path, base, out);
            }
        }
    }
    let mut links = Vec::new();
    if link_dir.exists() {
        walk(link_dir, link_dir, &mut links);
    }
    links.sort();
    links
}

#[test]
fn indexed_data_without_index_is_linked_but_not_listed() {
    let data = TempDir::new().unwrap();
    let public = TempDir::new().unwrap();
    let link_dir = public.path().join("proj").join("links");

    touch(data.path(), "s1/a.bam");
    touch(data.path(), "s1/a.bai");
    touch(data.path(), "s1/b.bam");

    let config = config(
        vec![data.path().to_path_buf()],
        link_dir.clone(),
        r"/(s\d+)/",
    );
    let plan = pipeline::publish(&config).unwrap();

    // Listing: one group, one file.
    assert_eq!(plan.listing.len(), 1);
    assert_eq!(plan.listing[0].group.as_str(), "s1");
    let labels: Vec<&str> = plan.listing[0]
        .files
        .iter()
        .map(|f| f.label.as_str())
        .collect();
    assert_eq!(labels, vec!["a.bam"]);

    assert_eq!(plan.report.missing_index.len(), 1);
    assert!(plan.report.missing_index[0].ends_with("s1/b.bam"));

    // The symlink tree still carries all three files.
    let links = collect_links(&link_dir);
    let names: Vec<&Path> = links.iter().map(|(rel, _)| rel.as_path()).collect();
    assert_eq!(
        names,
        vec![
            Path::new("s1/s1/a.bai"),
            Path::new("s1/s1/a.bam"),
            Path::new("s1/s1/b.bam"),
        ]
    );
    assert_eq!(plan.report.links_published, 3);
}

#[test]
fn file_prune_rules_drop_files_before_classification() {
    let data = TempDir::new().unwrap();
    let public = TempDir::new().unwrap();
    let link_dir = public.path().join("proj").join("links");

    touch(data.path(), "s1/a.bed");
    touch(data.path(), "s1/b.bed");

    let mut config = config(
        vec![data.path().to_path_buf()],
        link_dir,
        r"/(s\d+)/",
    );
    config.prune_files = vec!["b.*".to_string()];

    let plan = pipeline::publish(&config).unwrap();

    assert_eq!(plan.report.files_ignored, 1);
    assert_eq!(plan.report.files_displayed, 1);
    let labels: Vec<&str> = plan.listing[0]
        .files
        .iter()
        .map(|f| f.label.as_str())
        .collect();
    assert_eq!(labels, vec!["a.bed"]);
}

#[test]
fn cross_root_collision_keeps_last_writer() {
    let data = TempDir::new().unwrap();
    let public = TempDir::new().unwrap();
    let link_dir = public.path().join("proj").join("links");

    // Same group, same basename, directly under two different roots:
    // both resolve to <group>/f.bed.
    let first = touch(data.path(), "a/f.bed");
    let second = touch(data.path(), "b/f.bed");

    let config = config(
        vec![data.path().join("a"), data.path().join("b")],
        link_dir.clone(),
        r"(f)\.bed$",
    );
    let plan = pipeline::publish(&config).unwrap();

    assert_eq!(plan.report.collisions.len(), 1);
    assert_eq!(plan.report.collisions[0].previous_target, first);
    assert_eq!(plan.report.collisions[0].new_target, second);

    let links = collect_links(&link_dir);
    assert_eq!(links, vec![(PathBuf::from("f/f.bed"), second)]);
}

#[test]
fn publish_is_idempotent_over_an_unchanged_tree() {
    let data = TempDir::new().unwrap();
    let public = TempDir::new().unwrap();
    let link_dir = public.path().join("proj").join("links");

    touch(data.path(), "s1/a.bam");
    touch(data.path(), "s1/a.bam.bai");
    touch(data.path(), "s2/peaks.bed");

    let config = config(
        vec![data.path().to_path_buf()],
        link_dir.clone(),
        r"/(s\d+)/",
    );

    let first = pipeline::publish(&config).unwrap();
    let tree_after_first = collect_links(&link_dir);
    let second = pipeline::publish(&config).unwrap();
    let tree_after_second = collect_links(&link_dir);

    assert_eq!(tree_after_first, tree_after_second);
    assert_eq!(first.report.links_published, second.report.links_published);
    assert_eq!(
        serde_json::to_string(&first.listing).unwrap(),
        serde_json::to_string(&second.listing).unwrap()
    );
}

#[test]
fn unsafe_link_dir_refused_before_any_mutation() {
    let data = TempDir::new().unwrap();
    touch(data.path(), "s1/a.bed");

    let unsafe_dir = TempDir::new().unwrap();
    let marker = unsafe_dir.path().join("precious.txt");
    File::create(&marker).unwrap().write_all(b"keep").unwrap();

    let config = config(
        vec![data.path().to_path_buf()],
        unsafe_dir.path().to_path_buf(),
        r"/(s\d+)/",
    );
    let result = pipeline::publish(&config);

    assert!(matches!(result, Err(PipelineError::UnsafeLinkDir(_))));
    assert!(marker.exists());
}

#[test]
fn pruned_directories_are_counted_in_the_report() {
    let data = TempDir::new().unwrap();
    let public = TempDir::new().unwrap();
    let link_dir = public.path().join("proj").join("links");

    touch(data.path(), "s1/a.bed");
    touch(data.path(), "scratch/tmp.bed");
    touch(data.path(), "old/stale.bed");

    let mut config = config(
        vec![data.path().to_path_buf()],
        link_dir,
        r"/(s\d+)/",
    );
    config.prune_dirs = vec!["scratch".to_string(), "old".to_string()];

    let plan = pipeline::plan(&config).unwrap();

    assert_eq!(plan.report.dirs_pruned, 2);
    assert_eq!(plan.report.files_scanned, 1);
    // Both report renderings carry the count.
    let long = serde_json::to_value(&plan.report).unwrap();
    assert_eq!(long["dirs_pruned"], 2);
    let short = serde_json::to_value(plan.report.summary()).unwrap();
    assert_eq!(short["dirs_pruned"], 2);
}

#[test]
fn report_tracks_newest_modification_time() {
    let data = TempDir::new().unwrap();
    let public = TempDir::new().unwrap();
    let link_dir = public.path().join("proj").join("links");

    let old = touch(data.path(), "s1/old.bed");
    let new = touch(data.path(), "s1/new.bed");
    set_file_mtime(&old, FileTime::from_unix_time(1_500_000_000, 0)).unwrap();
    set_file_mtime(&new, FileTime::from_unix_time(1_700_000_000, 0)).unwrap();

    let config = config(
        vec![data.path().to_path_buf()],
        link_dir,
        r"/(s\d+)/",
    );
    let plan = pipeline::plan(&config).unwrap();

    let newest = plan.report.newest_modified.unwrap();
    assert_eq!(newest.timestamp(), 1_700_000_000);
}

#[test]
fn ungrouped_files_land_in_trailing_fallback_group() {
    let data = TempDir::new().unwrap();
    let public = TempDir::new().unwrap();
    let link_dir = public.path().join("proj").join("links");

    touch(data.path(), "s1/a.bed");
    touch(data.path(), "misc/stray.bed");

    let config = config(
        vec![data.path().to_path_buf()],
        link_dir,
        r"/(s\d+)/",
    );
    let plan = pipeline::plan(&config).unwrap();

    let groups: Vec<&str> = plan
        .listing
        .iter()
        .map(|g| g.group.as_str())
        .collect();
    assert_eq!(groups, vec!["s1", "~ungrouped"]);
    assert_eq!(plan.report.ungrouped_paths.len(), 1);
}
