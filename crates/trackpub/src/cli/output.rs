//! Rendering of the computed plan for the terminal.
//!
//! Text output prints the group listing followed by a counts summary;
//! `--long` appends the full diagnostic path lists, `--json` emits the
//! listing and the report (long or summary form) as one JSON document.

use std::path::PathBuf;
use trackpub::pipeline::{PublishPlan, RunReport};

pub fn render(plan: &PublishPlan, json: bool, long: bool) -> anyhow::Result<()> {
    if json {
        render_json(plan, long)
    } else {
        render_text(plan, long);
        Ok(())
    }
}

fn render_json(plan: &PublishPlan, long: bool) -> anyhow::Result<()> {
    let document = if long {
        serde_json::json!({
            "listing": plan.listing,
            "report": plan.report,
        })
    } else {
        serde_json::json!({
            "listing": plan.listing,
            "report": plan.report.summary(),
        })
    };
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn render_text(plan: &PublishPlan, long: bool) {
    for group in &plan.listing {
        println!("{}", group.group);
        for file in &group.files {
            println!("  {:<40} {}", file.label, file.link.display());
        }
    }
    if !plan.listing.is_empty() {
        println!();
    }

    let summary = plan.report.summary();
    println!(
        "scanned {} files in {} directories ({} files ignored, {} directories pruned)",
        summary.files_scanned, summary.dirs_scanned, summary.files_ignored, summary.dirs_pruned
    );
    println!(
        "listing {} files in {} groups, {} links resolved",
        summary.files_displayed,
        summary.groups_displayed,
        plan.links.len()
    );

    let notes = [
        ("unreadable directories", summary.unreadable_dirs),
        ("ungrouped paths", summary.ungrouped_paths),
        ("data files missing an index", summary.missing_index),
        ("orphaned index files", summary.orphan_indexes),
        ("link-name collisions", summary.collisions),
        ("unparseable display paths", summary.unparseable_paths),
    ];
    for (what, count) in notes {
        if count > 0 {
            println!("note: {count} {what}");
        }
    }

    if long {
        render_long_report(&plan.report);
    }
}

fn render_long_report(report: &RunReport) {
    print_paths("unreadable directories", &report.unreadable_dirs);
    print_paths("ungrouped paths", &report.ungrouped_paths);
    print_paths("data files missing an index", &report.missing_index);
    print_paths("orphaned index files", &report.orphan_indexes);
    print_paths("unparseable display paths", &report.unparseable_paths);

    if !report.collisions.is_empty() {
        println!("\nlink-name collisions:");
        for collision in &report.collisions {
            println!(
                "  {} <- {} (replaced {})",
                collision.link.display(),
                collision.new_target.display(),
                collision.previous_target.display()
            );
        }
    }
}

fn print_paths(title: &str, paths: &[PathBuf]) {
    if paths.is_empty() {
        return;
    }
    println!("\n{title}:");
    for path in paths {
        println!("  {}", path.display());
    }
}
