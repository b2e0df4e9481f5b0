//! Output module for presenting reports
//!
//! This module handles:
//! - Rendering finished reports as PDF documents
//! - Deriving safe download filenames
//! - Markdown output for the command line
//! - Aggregate statistics and per-URL history

mod canvas;
mod filename;
pub mod history;
mod markdown;
pub mod pdf;
pub mod stats;

pub use filename::{report_filename, sanitize_filename};
pub use history::{load_history, UrlHistory};
pub use markdown::{format_history_markdown, format_report_list, format_report_markdown};
pub use pdf::{render_report_pdf, ReportView};
pub use stats::{load_statistics, print_statistics, ReportStatistics};

use crate::state::ReportStatus;
use crate::storage::ReportRecord;
use crate::SageError;
use std::path::{Path, PathBuf};

/// A rendered PDF together with its download filename
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Renders a completed report
///
/// # Returns
///
/// * `Ok(RenderedReport)` - PDF bytes and filename
/// * `Err(SageError::ReportNotReady)` - The report is not `completed`
pub fn render_report(report: &ReportRecord) -> Result<RenderedReport, SageError> {
    if report.status != ReportStatus::Completed {
        return Err(SageError::ReportNotReady {
            id: report.id,
            status: report.status,
        });
    }

    let bytes = render_report_pdf(&ReportView::from(report))?;
    let filename = report_filename(report.title.as_deref(), &report.url);

    tracing::debug!("Rendered report {} as {}", report.id, filename);

    Ok(RenderedReport { filename, bytes })
}

/// Renders a completed report and writes it into `dir`
///
/// Creates `dir` if needed and returns the path of the written file.
pub fn write_report_pdf(report: &ReportRecord, dir: &Path) -> Result<PathBuf, SageError> {
    let rendered = render_report(report)?;

    std::fs::create_dir_all(dir)?;
    let path = dir.join(&rendered.filename);
    std::fs::write(&path, &rendered.bytes)?;

    Ok(path)
}
