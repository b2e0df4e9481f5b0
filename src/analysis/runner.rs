//! Analysis orchestration
//!
//! The [`Analyzer`] owns the pieces one analysis needs (HTTP client, storage
//! handle, optional insight generator) and drives a report through
//! `pending → processing → completed | failed`.

use crate::analysis::fetcher::{build_http_client, fetch_page, FetchError};
use crate::config::Config;
use crate::insights::{generate_or_fallback, GeminiClient, InsightGenerator, MISSING_API_KEY_SUMMARY};
use crate::seo;
use crate::state::ReportStatus;
use crate::storage::{CompletedAnalysis, ReportRecord, SqliteStorage, Storage, StorageError};
use crate::url::parse_target_url;
use crate::SageError;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Message returned when an existing completed report is reused
pub const COMPLETED_MESSAGE: &str = "Analysis completed successfully";

/// Message returned when a new analysis was scheduled
pub const STARTED_MESSAGE: &str = "Analysis started successfully";

/// Outcome of a single submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub report_id: i64,
    pub status: ReportStatus,
    pub message: String,
}

/// Outcome of a batch submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSubmission {
    pub batch_id: String,
    pub total_urls: usize,
    pub submitted_reports: Vec<i64>,
    pub status: ReportStatus,
    pub message: String,
}

/// Why an analysis ended in `failed`
#[derive(Debug, Error)]
enum AnalysisFailure {
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] FetchError),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(#[from] StorageError),
}

/// Runs analyses against shared storage
#[derive(Clone)]
pub struct Analyzer {
    storage: Arc<Mutex<SqliteStorage>>,
    client: Client,
    insights: Option<Arc<dyn InsightGenerator>>,
}

impl Analyzer {
    /// Creates an analyzer from configuration
    ///
    /// The insight generator is only built when an API key is configured.
    pub fn new(config: &Config, storage: Arc<Mutex<SqliteStorage>>) -> Result<Self, SageError> {
        let client = build_http_client(&config.fetch)?;
        let insights = GeminiClient::from_config(&config.insights)?
            .map(|gemini| Arc::new(gemini) as Arc<dyn InsightGenerator>);

        if insights.is_none() {
            tracing::info!("No LLM API key configured, AI insights are disabled");
        }

        Ok(Self::from_parts(storage, client, insights))
    }

    /// Creates an analyzer from already-built collaborators
    pub fn from_parts(
        storage: Arc<Mutex<SqliteStorage>>,
        client: Client,
        insights: Option<Arc<dyn InsightGenerator>>,
    ) -> Self {
        Self {
            storage,
            client,
            insights,
        }
    }

    /// Shared storage handle
    pub fn storage(&self) -> &Arc<Mutex<SqliteStorage>> {
        &self.storage
    }

    fn lock_storage(&self) -> MutexGuard<'_, SqliteStorage> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submits a URL for analysis
    ///
    /// Returns the latest completed report for the identical URL if one
    /// exists; otherwise creates a pending report and spawns the analysis on
    /// the current tokio runtime.
    pub fn submit(&self, url: &str, include_ai: bool) -> Result<Submission, SageError> {
        let url = parse_target_url(url)?.to_string();

        let report_id = {
            let mut storage = self.lock_storage();
            if let Some(existing) = storage.find_completed_by_url(&url)? {
                tracing::info!("Reusing completed report {} for {}", existing.id, url);
                return Ok(Submission {
                    report_id: existing.id,
                    status: ReportStatus::Completed,
                    message: COMPLETED_MESSAGE.to_string(),
                });
            }
            storage.create_report(&url)?
        };

        self.spawn_analysis(report_id, url, include_ai);

        Ok(Submission {
            report_id,
            status: ReportStatus::Processing,
            message: STARTED_MESSAGE.to_string(),
        })
    }

    /// Submits several URLs, creating one report per URL
    ///
    /// Every URL is validated before any report is created. Completed reports
    /// are not reused.
    pub fn submit_batch(
        &self,
        urls: &[String],
        include_ai: bool,
    ) -> Result<BatchSubmission, SageError> {
        let targets = urls
            .iter()
            .map(|url| parse_target_url(url).map(|parsed| parsed.to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        let batch_id = batch_id(&targets);
        let mut submitted = Vec::with_capacity(targets.len());

        for url in targets {
            let report_id = self.lock_storage().create_report(&url)?;
            self.spawn_analysis(report_id, url, include_ai);
            submitted.push(report_id);
        }

        tracing::info!("Batch {} submitted {} reports", batch_id, submitted.len());

        Ok(BatchSubmission {
            batch_id,
            total_urls: submitted.len(),
            status: ReportStatus::Processing,
            message: format!("Batch analysis started for {} URLs", submitted.len()),
            submitted_reports: submitted,
        })
    }

    /// Creates a report and runs the analysis to completion
    pub async fn analyze_now(&self, url: &str, include_ai: bool) -> Result<ReportRecord, SageError> {
        let url = parse_target_url(url)?.to_string();
        let report_id = self.lock_storage().create_report(&url)?;

        self.run_analysis(report_id, &url, include_ai).await;

        Ok(self.lock_storage().get_report(report_id)?)
    }

    fn spawn_analysis(&self, report_id: i64, url: String, include_ai: bool) {
        let analyzer = self.clone();
        tokio::spawn(async move {
            analyzer.run_analysis(report_id, &url, include_ai).await;
        });
    }

    /// Runs one analysis and records its outcome on the report
    ///
    /// Never returns an error: failures are stored on the report as a
    /// human-readable message.
    pub async fn run_analysis(&self, report_id: i64, url: &str, include_ai: bool) {
        tracing::info!("Starting analysis of {} (report {})", url, report_id);

        match self.execute(report_id, url, include_ai).await {
            Ok(score) => {
                tracing::info!("Report {} completed with score {}", report_id, score);
            }
            Err(failure) => {
                tracing::warn!("Report {} failed: {}", report_id, failure);
                let message = failure.to_string();
                if let Err(e) = self.lock_storage().fail_report(report_id, &message) {
                    tracing::error!("Could not mark report {} as failed: {}", report_id, e);
                }
            }
        }
    }

    async fn execute(
        &self,
        report_id: i64,
        url: &str,
        include_ai: bool,
    ) -> Result<u32, AnalysisFailure> {
        self.lock_storage()
            .update_status(report_id, ReportStatus::Processing)?;

        let page = fetch_page(&self.client, url).await?;
        let metrics = seo::score(&page.body, page.elapsed_ms, url);

        let (ai_summary, ai_recommendations) = if include_ai {
            match &self.insights {
                Some(generator) => {
                    let insights = generate_or_fallback(generator.as_ref(), &metrics).await;
                    (Some(insights.summary), Some(insights.recommendations))
                }
                None => {
                    tracing::warn!("AI insights requested but no API key is configured");
                    (Some(MISSING_API_KEY_SUMMARY.to_string()), None)
                }
            }
        } else {
            (None, None)
        };

        let score = metrics.score;
        let analysis = CompletedAnalysis {
            metrics,
            load_time_ms: page.elapsed_ms,
            ai_summary,
            ai_recommendations,
        };
        self.lock_storage().complete_report(report_id, &analysis)?;

        Ok(score)
    }
}

/// Derives a short batch identifier from the URLs and the submission time
fn batch_id(urls: &[String]) -> String {
    let mut hasher = Sha256::new();
    for url in urls {
        hasher.update(url.as_bytes());
        hasher.update(b"\n");
    }
    hasher.update(Utc::now().to_rfc3339().as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("batch_{}", &digest[..8])
}
