//! Markdown rendering of reports for terminal output

use crate::output::history::UrlHistory;
use crate::storage::ReportRecord;

fn or_na<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Formats a single report as markdown
///
/// # Arguments
///
/// * `report` - The report to format
///
/// # Returns
///
/// A formatted markdown string
pub fn format_report_markdown(report: &ReportRecord) -> String {
    let mut md = String::new();

    md.push_str(&format!("# SiteSage Report #{}\n\n", report.id));
    md.push_str(&format!("- **URL**: {}\n", report.url));
    md.push_str(&format!("- **Status**: {}\n", report.status));
    md.push_str(&format!("- **Created**: {}\n", report.created_at));
    if let Some(completed) = &report.completed_at {
        md.push_str(&format!("- **Completed**: {}\n", completed));
    }
    md.push('\n');

    if let Some(error) = &report.error_message {
        md.push_str("## Error\n\n");
        md.push_str(&format!("{}\n\n", error));
    }

    if let Some(score) = report.seo_score {
        md.push_str(&format!("## SEO Score: {}/100\n\n", score));
    }

    if let Some(metrics) = report.metrics() {
        md.push_str("## Metrics\n\n");
        md.push_str("| Metric | Value |\n");
        md.push_str("|--------|-------|\n");
        md.push_str(&format!("| Title | {} |\n", metrics.title));
        md.push_str(&format!(
            "| Meta Description | {} |\n",
            metrics.meta_description
        ));
        md.push_str(&format!("| H1 Count | {} |\n", metrics.h1_count));
        md.push_str(&format!("| H2 Count | {} |\n", metrics.h2_count));
        md.push_str(&format!("| Images | {} |\n", metrics.image_count));
        md.push_str(&format!(
            "| Images Missing Alt | {} |\n",
            metrics.images_missing_alt
        ));
        md.push_str(&format!(
            "| Internal Links | {} |\n",
            metrics.internal_links_count
        ));
        md.push_str(&format!(
            "| External Links | {} |\n",
            metrics.external_links_count
        ));
        md.push_str(&format!(
            "| Load Time (ms) | {} ({}) |\n\n",
            or_na(report.load_time_ms),
            metrics.load_time_status
        ));
    }

    if let Some(summary) = &report.ai_summary {
        md.push_str("## Executive Summary\n\n");
        md.push_str(&format!("{}\n\n", summary));
    }

    if let Some(recommendations) = report.ai_recommendations.as_ref().filter(|r| !r.is_empty()) {
        md.push_str("## AI Recommendations\n\n");
        for recommendation in recommendations {
            md.push_str(&format!("- {}\n", recommendation));
        }
        md.push('\n');
    }

    md
}

/// Formats a page of reports as a markdown table
pub fn format_report_list(reports: &[ReportRecord], total: u64, page: u32) -> String {
    let mut md = String::new();

    md.push_str(&format!(
        "# Reports (page {}, {} of {} total)\n\n",
        page,
        reports.len(),
        total
    ));

    if reports.is_empty() {
        md.push_str("No reports found.\n");
        return md;
    }

    md.push_str("| ID | Status | Score | URL | Created |\n");
    md.push_str("|----|--------|-------|-----|---------|\n");
    for report in reports {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            report.id,
            report.status,
            or_na(report.seo_score),
            report.url,
            report.created_at
        ));
    }

    md
}

/// Formats a URL's history as markdown
pub fn format_history_markdown(history: &UrlHistory) -> String {
    let mut md = String::new();

    md.push_str(&format!("# History for {}\n\n", history.url));
    md.push_str(&format!(
        "- **Completed analyses**: {} in the last {} days\n",
        history.total_reports, history.time_period_days
    ));
    md.push_str(&format!(
        "- **Score change**: {:+}\n\n",
        history.trends.seo_score_change
    ));

    if !history.reports.is_empty() {
        md.push_str("| ID | Score | Created |\n");
        md.push_str("|----|-------|---------|\n");
        for entry in &history.reports {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                entry.id,
                or_na(entry.seo_score),
                entry.created_at
            ));
        }
    }

    md
}
