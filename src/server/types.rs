//! Shared state and wire types for the HTTP API

use crate::analysis::Analyzer;
use crate::storage::{ReportRecord, SqliteStorage, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::sync::{MutexGuard, PoisonError};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
}

impl AppState {
    pub fn new(analyzer: Analyzer) -> Self {
        Self { analyzer }
    }

    /// Locks the report database
    ///
    /// The guard must be dropped before the handler awaits anything.
    pub fn storage(&self) -> MutexGuard<'_, SqliteStorage> {
        self.analyzer
            .storage()
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn default_true() -> bool {
    true
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Body of `POST /analyze`
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
    #[serde(default = "default_true")]
    pub include_ai_insights: bool,
}

/// Body of `POST /batch-analyze`
#[derive(Debug, Clone, Deserialize)]
pub struct BatchAnalyzeRequest {
    pub urls: Vec<String>,
    #[serde(default = "default_true")]
    pub include_ai_insights: bool,
}

/// Query string of the report listing
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub status: Option<String>,
    pub url: Option<String>,
}

/// One page of reports
#[derive(Debug, Clone, Serialize)]
pub struct ReportList {
    pub reports: Vec<ReportRecord>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

/// Query string of the history endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub url: String,
    pub days: Option<u32>,
}

/// Body of error responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
