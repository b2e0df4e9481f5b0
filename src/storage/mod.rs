//! Storage module for persisting analysis reports
//!
//! This module handles all database operations for SiteSage, including:
//! - SQLite database initialization and schema management
//! - Report lifecycle persistence (`pending → processing → completed | failed`)
//! - Listing, per-URL history and aggregate statistics queries

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::seo::Metrics;
use crate::state::ReportStatus;
use crate::SageError;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::Path;

/// Largest page size accepted by [`ReportFilter`]
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default page size for listings
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
pub fn open_storage(path: &Path) -> Result<SqliteStorage, SageError> {
    SqliteStorage::new(path)
}

/// Formats a timestamp the way it is stored in the database
///
/// Fixed-width UTC so stored values compare correctly as strings.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Represents a report in the database
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord {
    pub id: i64,
    pub url: String,
    pub status: ReportStatus,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub seo_score: Option<u32>,
    pub load_time_ms: Option<u64>,
    /// Full metrics object as JSON
    pub raw_metrics: Option<serde_json::Value>,
    pub ai_summary: Option<String>,
    pub ai_recommendations: Option<Vec<String>>,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub completed_at: Option<String>,
}

impl ReportRecord {
    /// Deserializes the stored metrics, if any
    pub fn metrics(&self) -> Option<Metrics> {
        self.raw_metrics
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

/// Everything written to a report when its analysis completes
#[derive(Debug, Clone)]
pub struct CompletedAnalysis {
    pub metrics: Metrics,
    pub load_time_ms: u64,
    pub ai_summary: Option<String>,
    pub ai_recommendations: Option<Vec<String>>,
}

/// Filter and pagination for report listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    /// Case-sensitive substring match against the report URL
    pub url_contains: Option<String>,
    pub skip: u32,
    pub limit: u32,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            status: None,
            url_contains: None,
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ReportFilter {
    /// Clamps the page size into `1..=MAX_PAGE_SIZE`
    pub fn clamped(mut self) -> Self {
        self.limit = self.limit.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// One-based page number implied by `skip` and `limit`
    pub fn page(&self) -> u32 {
        self.skip / self.limit.max(1) + 1
    }
}

/// Completed-analysis summary for a single URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlSummary {
    pub url: String,
    pub analysis_count: u64,
    pub avg_seo_score: Option<f64>,
}
