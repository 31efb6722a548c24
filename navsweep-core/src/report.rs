// Report generation from a finished crawl

use crate::crawl::{CheckOutcome, CrawlSummary, MenuReport, PageCheck};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let mut path = u.path().to_string();
            if path.is_empty() {
                path.push('/');
            }
            if let Some(query) = u.query() {
                path.push('?');
                path.push_str(query);
            }
            path
        })
        .unwrap_or_else(|| url.to_string())
}

fn status_marker(check: &PageCheck) -> &'static str {
    match check.outcome {
        CheckOutcome::Matched { .. } => "PASS",
        CheckOutcome::Mismatch { .. } => "WARN",
        CheckOutcome::NavigationFailed { .. } => "FAIL",
    }
}

fn outcome_detail(check: &PageCheck) -> String {
    match &check.outcome {
        CheckOutcome::Matched { strategy, snippet } => format!("{} '{}'", strategy, snippet),
        CheckOutcome::Mismatch { heading: Some(h) } => format!("heading was '{}'", h),
        CheckOutcome::Mismatch { heading: None } => "no heading found".to_string(),
        CheckOutcome::NavigationFailed { error } => error.clone(),
    }
}

fn menu_header(menu: &MenuReport) -> String {
    match (&menu.url, menu.skipped) {
        (_, true) => format!("{} (skipped: no resolvable link)", menu.label),
        (Some(url), false) => format!("{} -> {}", menu.label, url),
        (None, false) => menu.label.clone(),
    }
}

pub fn generate_text_report(summary: &CrawlSummary) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str(&format!(
        "                     NAVSWEEP {} CRAWL REPORT\n",
        summary.kind.to_string().to_uppercase()
    ));
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("Start page:      {}\n", summary.base_url));
    report.push_str(&format!("Menus:           {}\n", summary.menus.len()));
    report.push_str(&format!("Pages checked:   {}\n", summary.total_checks()));
    report.push_str(&format!("  Passed:        {}\n", summary.passed()));
    report.push_str(&format!("  Title warnings: {}\n", summary.mismatched()));
    report.push_str(&format!("  Failed loads:  {}\n", summary.failed_navigations()));
    report.push_str(&format!("Skipped menus:   {}\n", summary.skipped_menus()));
    report.push_str(&format!("Duplicate links: {}\n\n", summary.duplicates.total()));

    for menu in &summary.menus {
        report.push_str(RULE);
        report.push_str(&format!("{}\n", menu_header(menu)));
        report.push_str(RULE);

        if let Some(ref check) = menu.title_check {
            report.push_str(&format!(
                "  [{}] (menu page) {}\n",
                status_marker(check),
                outcome_detail(check)
            ));
        }

        for check in &menu.links {
            report.push_str(&format!(
                "  [{}] {}  {}  {}\n",
                status_marker(check),
                check.label,
                extract_url_path(&check.url),
                outcome_detail(check)
            ));
        }

        if menu.dropped_links > 0 {
            report.push_str(&format!(
                "  ({} links without a usable href were ignored)\n",
                menu.dropped_links
            ));
        }
        report.push('\n');
    }

    report.push_str(RULE);
    report.push_str("DUPLICATE LINKS\n");
    report.push_str(RULE);
    if summary.duplicates.is_empty() {
        report.push_str("  none\n");
    }
    for group in &summary.duplicates.groups {
        report.push_str(&format!("\n{}\n", group.menu_label));
        for dup in &group.records {
            report.push_str(&format!(
                "  '{}' duplicates '{}'  {}\n",
                dup.label, dup.duplicate_of_label, dup.url
            ));
        }
    }
    report.push('\n');

    report
}

fn escape_markdown_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

pub fn generate_markdown_report(summary: &CrawlSummary) -> String {
    let mut report = String::new();

    report.push_str(&format!("# navsweep {} crawl report\n\n", summary.kind));
    report.push_str(&format!("- **Start page:** {}\n", summary.base_url));
    report.push_str(&format!(
        "- **Pages checked:** {} ({} passed, {} title warnings, {} failed loads)\n",
        summary.total_checks(),
        summary.passed(),
        summary.mismatched(),
        summary.failed_navigations()
    ));
    report.push_str(&format!("- **Skipped menus:** {}\n", summary.skipped_menus()));
    report.push_str(&format!(
        "- **Duplicate links:** {}\n\n",
        summary.duplicates.total()
    ));

    for menu in &summary.menus {
        report.push_str(&format!("## {}\n\n", escape_markdown_cell(&menu_header(menu))));
        if menu.skipped {
            continue;
        }

        report.push_str("| Result | Label | URL | Detail |\n");
        report.push_str("|--------|-------|-----|--------|\n");
        for check in menu.checks() {
            report.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                status_marker(check),
                escape_markdown_cell(&check.label),
                check.url,
                escape_markdown_cell(&outcome_detail(check))
            ));
        }
        report.push('\n');
    }

    report.push_str("## Duplicate links\n\n");
    if summary.duplicates.is_empty() {
        report.push_str("None.\n");
    }
    for group in &summary.duplicates.groups {
        report.push_str(&format!("### {}\n\n", group.menu_label));
        for dup in &group.records {
            report.push_str(&format!(
                "- `{}` duplicates `{}` ({})\n",
                dup.label, dup.duplicate_of_label, dup.url
            ));
        }
        report.push('\n');
    }

    report
}

pub fn generate_json_report(summary: &CrawlSummary) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "navsweep",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "crawl": {
                "kind": summary.kind,
                "base_url": summary.base_url
            },
            "summary": {
                "menus": summary.menus.len(),
                "total_checks": summary.total_checks(),
                "passed": summary.passed(),
                "mismatched": summary.mismatched(),
                "failed_navigations": summary.failed_navigations(),
                "skipped_menus": summary.skipped_menus(),
                "duplicates": summary.duplicates.total()
            },
            "menus": summary.menus,
            "duplicates": summary.duplicates.groups
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn render_report(summary: &CrawlSummary, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(summary)),
        ReportFormat::Markdown => Ok(generate_markdown_report(summary)),
        ReportFormat::Json => generate_json_report(summary),
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
