//! Score history for a single URL

use crate::storage::Storage;
use crate::url::parse_target_url;
use crate::SageError;
use chrono::{Duration, Utc};
use serde::Serialize;

/// Longest look-back window accepted
pub const MAX_HISTORY_DAYS: u32 = 365;

/// Default look-back window
pub const DEFAULT_HISTORY_DAYS: u32 = 30;

/// One completed analysis in a URL's history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub seo_score: Option<u32>,
    pub created_at: String,
}

/// Score movement over the window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Trends {
    /// Latest score minus earliest score; 0 with fewer than two reports
    pub seo_score_change: i64,
}

/// Completed analyses of one URL within a time window, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlHistory {
    pub url: String,
    pub total_reports: usize,
    pub time_period_days: u32,
    pub reports: Vec<HistoryEntry>,
    pub trends: Trends,
}

/// Loads the history of `url` over the last `days` days (capped at a year)
///
/// Valid URLs are looked up in the canonical form reports are stored under.
pub fn load_history(storage: &dyn Storage, url: &str, days: u32) -> Result<UrlHistory, SageError> {
    let url = parse_target_url(url)
        .map(|parsed| parsed.to_string())
        .unwrap_or_else(|_| url.to_string());
    let days = days.min(MAX_HISTORY_DAYS);
    let since = Utc::now() - Duration::days(i64::from(days));

    let reports: Vec<HistoryEntry> = storage
        .history_for_url(&url, since)?
        .into_iter()
        .map(|report| HistoryEntry {
            id: report.id,
            seo_score: report.seo_score,
            created_at: report.created_at,
        })
        .collect();

    let trends = match (reports.first(), reports.last()) {
        (Some(latest), Some(earliest)) if reports.len() >= 2 => Trends {
            seo_score_change: i64::from(latest.seo_score.unwrap_or(0))
                - i64::from(earliest.seo_score.unwrap_or(0)),
        },
        _ => Trends::default(),
    };

    Ok(UrlHistory {
        url,
        total_reports: reports.len(),
        time_period_days: days,
        reports,
        trends,
    })
}
