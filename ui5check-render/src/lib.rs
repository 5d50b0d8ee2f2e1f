//! Rendering helpers (markdown and plain text) for human-readable artifacts.

use ui5check_types::VERSION_OVERVIEW_PAGE;
use ui5check_types::catalog::{Catalog, CatalogLine};
use ui5check_types::report::{CheckReport, ReportStatus};

pub const SUMMARY_HEADING: &str = "UI5 Version Check Result";
pub const OVERVIEW_LINK_TEXT: &str =
    "Check this link for valid UI5 versions that can be used in SAP BTP";

/// Markdown summary table, one row per checked manifest, in check order.
pub fn render_summary_md(report: &CheckReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("## {}\n\n", SUMMARY_HEADING));

    if report.dry_run {
        out.push_str("_Dry run: no manifest was written._\n\n");
    }

    out.push_str("| Manifest path | Found version | Updated version | Status | Description |\n");
    out.push_str("| --- | --- | --- | --- | --- |\n");
    for r in &report.results {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            cell(&r.path),
            cell(r.found_version.as_deref().unwrap_or("-")),
            cell(r.updated_version.as_deref().unwrap_or("-")),
            r.status_icon(),
            cell(&r.status_text),
        ));
    }

    let advisories: Vec<_> = report
        .results
        .iter()
        .flat_map(|r| r.advisories.iter().map(move |a| (r.path.as_str(), a)))
        .collect();
    if !advisories.is_empty() {
        out.push_str("\n### Advisories\n\n");
        for (path, note) in advisories {
            out.push_str(&format!("- `{}`: {}\n", path, note));
        }
    }

    if report.has_errors {
        out.push_str("\n**Some manifest.json files contain invalid/outdated versions**\n");
    }

    out.push_str(&format!("\n[{}]({})\n", OVERVIEW_LINK_TEXT, VERSION_OVERVIEW_PAGE));
    out
}

/// One-line text verdict for terminal output.
pub fn render_verdict_line(report: &CheckReport) -> String {
    format!(
        "{}: {} manifest(s) checked, {} updated, {} error(s)",
        status_label(report.status),
        report.results.len(),
        report.updated_files.len(),
        report.error_count
    )
}

/// Plain-text table of catalog lines in document order.
pub fn render_versions_text(catalog: &Catalog, lts_only: bool) -> String {
    let rows: Vec<[String; 5]> = lines(catalog, lts_only)
        .map(|l| {
            [
                l.raw.clone(),
                yes_no(l.is_lts).to_string(),
                if l.is_out_of_maintenance {
                    "out of maintenance".to_string()
                } else {
                    "maintained".to_string()
                },
                l.eocp_info
                    .map(|e| e.eocp_date.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                l.latest_patch()
                    .map(|p| format!("{}.{}", l.key(), p))
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    let header = ["VERSION", "LTS", "SUPPORT", "EOCP", "LATEST PATCH"].map(str::to_string);
    let mut widths = header.each_ref().map(|h| h.len());
    for row in &rows {
        for (w, c) in widths.iter_mut().zip(row) {
            *w = (*w).max(c.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&header).chain(rows.iter()) {
        let line = row
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{:<w$}", c, w = w))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn lines(catalog: &Catalog, lts_only: bool) -> impl Iterator<Item = &CatalogLine> {
    catalog.lines.values().filter(move |l| !lts_only || l.is_lts)
}

fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

fn status_label(s: ReportStatus) -> &'static str {
    match s {
        ReportStatus::Pass => "pass",
        ReportStatus::Warn => "warn",
        ReportStatus::Fail => "fail",
    }
}
