//! Storage traits and error types
//!
//! This module defines the trait interface for report storage backends and
//! associated error types.

use crate::state::ReportStatus;
use crate::storage::{CompletedAnalysis, ReportFilter, ReportRecord, UrlSummary};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Report not found: {0}")]
    ReportNotFound(i64),

    #[error("Invalid status transition for report {id}: {from} -> {to}")]
    InvalidTransition {
        id: i64,
        from: ReportStatus,
        to: ReportStatus,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for report storage backends
///
/// Field updates are last-writer-wins; status changes are checked against
/// [`ReportStatus::can_transition_to`].
pub trait Storage {
    // ===== Report Lifecycle =====

    /// Creates a new report in the `pending` state and returns its ID
    fn create_report(&mut self, url: &str) -> StorageResult<i64>;

    /// Gets a report by ID
    fn get_report(&self, report_id: i64) -> StorageResult<ReportRecord>;

    /// Gets the most recent `completed` report for exactly this URL
    fn find_completed_by_url(&self, url: &str) -> StorageResult<Option<ReportRecord>>;

    /// Moves a report to a new status without touching other fields
    fn update_status(&mut self, report_id: i64, status: ReportStatus) -> StorageResult<()>;

    /// Stores analysis results and marks the report `completed`
    fn complete_report(
        &mut self,
        report_id: i64,
        analysis: &CompletedAnalysis,
    ) -> StorageResult<()>;

    /// Marks the report `failed` with a human-readable message
    fn fail_report(&mut self, report_id: i64, error_message: &str) -> StorageResult<()>;

    // ===== Queries =====

    /// Lists reports newest first, returning the page and the total number
    /// of reports matching the filter
    fn list_reports(&self, filter: &ReportFilter) -> StorageResult<(Vec<ReportRecord>, u64)>;

    /// Lists completed reports for a URL created at or after `since`, newest first
    fn history_for_url(
        &self,
        url: &str,
        since: DateTime<Utc>,
    ) -> StorageResult<Vec<ReportRecord>>;

    // ===== Statistics =====

    /// Counts reports, optionally restricted to one status
    fn count_reports(&self, status: Option<ReportStatus>) -> StorageResult<u64>;

    /// Average score of completed reports, `None` when there are none
    fn average_completed_score(&self) -> StorageResult<Option<f64>>;

    /// Counts reports created at or after `since`
    fn count_created_since(&self, since: DateTime<Utc>) -> StorageResult<u64>;

    /// URLs with the most completed analyses
    fn top_urls(&self, limit: u32) -> StorageResult<Vec<UrlSummary>>;
}
