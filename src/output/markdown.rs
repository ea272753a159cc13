//! Markdown run summary generation
//!
//! This module generates a human-readable summary of a completed run:
//! totals, failed sources, and a per-source page/post table.

use crate::config::Source;
use crate::crawler::{RunSummary, SourceStatus};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary of a run
///
/// # Arguments
///
/// * `summary` - The completed run
/// * `sources` - The roster, used for display names
/// * `output_path` - Path where the markdown file should be written
pub fn write_run_summary(
    summary: &RunSummary,
    sources: &[Source],
    output_path: &Path,
) -> std::io::Result<()> {
    let markdown = format_run_summary(summary, sources);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run summary as markdown
pub fn format_run_summary(summary: &RunSummary, sources: &[Source]) -> String {
    let metadata = &summary.metadata;
    let mut md = String::new();

    md.push_str("# Council Blog Scrape Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Completed**: {}\n",
        metadata.completed_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Posts Before Run**: {}\n",
        summary.previous_posts
    ));
    md.push_str(&format!("- **New Posts**: {}\n", metadata.new_posts));
    md.push_str(&format!(
        "- **Already Known**: {}\n",
        summary.duplicates
    ));
    md.push_str(&format!("- **Total Posts**: {}\n\n", metadata.total_posts));

    md.push_str("## Failed Sources\n\n");
    if metadata.failed_sources.is_empty() {
        md.push_str("None\n\n");
    } else {
        for id in &metadata.failed_sources {
            md.push_str(&format!("- {} ({})\n", id, source_name(sources, *id)));
        }
        md.push('\n');
    }

    md.push_str("## Sources\n\n");
    md.push_str("| ID | Name | Pages | Fetched | Posts | Skipped Cards | Status |\n");
    md.push_str("|----|------|-------|---------|-------|---------------|--------|\n");
    for report in &summary.reports {
        let status = match &report.status {
            SourceStatus::Completed if report.failed_pages.is_empty() => "ok".to_string(),
            SourceStatus::Completed => {
                let pages: Vec<String> = report
                    .failed_pages
                    .iter()
                    .map(|failure| failure.page.to_string())
                    .collect();
                format!("pages {} failed", pages.join(", "))
            }
            SourceStatus::Failed { reason } => format!("failed: {}", reason.replace('|', "/")),
        };

        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            report.source_id,
            source_name(sources, report.source_id),
            report.pages_total,
            report.pages_fetched,
            report.posts.len(),
            report.rejected_cards,
            status
        ));
    }
    md.push('\n');

    md
}

fn source_name(sources: &[Source], id: u32) -> &str {
    sources
        .iter()
        .find(|s| s.id == id)
        .map(|s| s.name.as_str())
        .unwrap_or("unknown")
}
