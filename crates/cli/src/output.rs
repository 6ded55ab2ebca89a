//! Rendering of a merge result in the formats `trimerge merge` offers.

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

use trimerge_core::config::MarkerConfig;
use trimerge_core::{ConflictResolver, FileMergeResult, MergeRegion, Side};

use crate::style;

/// Output format for `trimerge merge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Region table with a summary.
    Table,
    /// The full result as JSON.
    Json,
    /// The merged document with conflict markers.
    Markers,
    /// The merged document; every conflict must be resolved.
    Resolved,
}

const PREVIEW_WIDTH: usize = 40;

/// First line of the region's text, shortened to fit a table cell.
pub fn preview(region: &MergeRegion) -> String {
    let lines = if region.is_conflict() {
        &region.ours_lines
    } else {
        &region.lines
    };
    let Some(first) = lines.first() else {
        return "(empty)".to_string();
    };

    let mut text: String = first.chars().take(PREVIEW_WIDTH).collect();
    if first.chars().count() > PREVIEW_WIDTH || lines.len() > 1 {
        text.push('…');
    }
    text
}

/// Line count per side, `ours/theirs` when they differ.
fn line_counts(region: &MergeRegion) -> String {
    let ours = region.side_lines(Side::Ours).len();
    let theirs = region.side_lines(Side::Theirs).len();
    if ours == theirs {
        ours.to_string()
    } else {
        format!("{}/{}", ours, theirs)
    }
}

pub fn render_table(result: &FileMergeResult) -> String {
    let mut out = String::new();
    let title = match &result.file_path {
        Some(path) => format!("Merge regions for {} ({})", path, result.regions.len()),
        None => format!("Merge regions ({})", result.regions.len()),
    };
    out.push_str(&style::header(&title));
    out.push_str("\n\n");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Type", "Base", "Ours", "Theirs", "Lines", "Preview"]);

    for region in &result.regions {
        table.add_row(vec![
            Cell::new(region.index),
            Cell::new(style::region_type(region.region_type)),
            Cell::new(region.base_start_line),
            Cell::new(region.ours_start_line),
            Cell::new(region.theirs_start_line),
            Cell::new(line_counts(region)),
            Cell::new(preview(region)),
        ]);
    }
    out.push_str(&table.to_string());
    out.push_str("\n\n");

    let summary = result.summary();
    out.push_str(&style::dim(&format!(
        "{} unchanged, {} ours only, {} theirs only, {} conflict(s)",
        summary.unchanged, summary.ours_only, summary.theirs_only, summary.conflicts
    )));
    out.push('\n');
    out.push_str(&if summary.conflicts == 0 {
        style::success("Merge is clean")
    } else {
        style::warn(&format!("{} conflict(s) need resolution", summary.conflicts))
    });
    out.push('\n');
    out
}

pub fn render_json(
    result: &FileMergeResult,
    resolver: &ConflictResolver<'_>,
) -> anyhow::Result<String> {
    let report = json!({
        "file_path": result.file_path,
        "summary": result.summary(),
        "unresolved": resolver.unresolved(),
        "regions": result.regions,
    });
    Ok(serde_json::to_string_pretty(&report)?)
}

/// `Markers` and `Resolved` formats. `Resolved` fails while any conflict is
/// open.
pub fn render_document(
    format: OutputFormat,
    resolver: &ConflictResolver<'_>,
    markers: &MarkerConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Resolved => Ok(resolver.merged_content()?),
        _ => Ok(resolver.render_with_markers(markers)),
    }
}
