//! Statistics generation from the report database
//!
//! This module provides functionality for extracting and displaying
//! aggregate analysis statistics from the storage layer.

use crate::state::ReportStatus;
use crate::storage::{Storage, UrlSummary};
use crate::SageError;
use chrono::{Duration, Utc};
use serde::Serialize;

/// Window counted as "recent" activity
pub const RECENT_DAYS: i64 = 7;

/// Number of URLs listed in the top-URL table
pub const TOP_URL_LIMIT: u32 = 5;

/// Aggregate statistics over all reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportStatistics {
    /// Total number of reports in any state
    pub total_analyses: u64,

    /// Reports that reached `completed`
    pub completed_analyses: u64,

    /// Completed share of all reports, in percent, one decimal
    pub success_rate: f64,

    /// Mean score over completed reports, one decimal; 0 when there are none
    pub average_seo_score: f64,

    /// Reports created in the last seven days
    pub recent_analyses: u64,

    /// URLs with the most completed analyses
    pub top_urls: Vec<UrlSummary>,
}

/// Rounds to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(ReportStatistics)` - Successfully loaded statistics
/// * `Err(SageError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<ReportStatistics, SageError> {
    let total_analyses = storage.count_reports(None)?;
    let completed_analyses = storage.count_reports(Some(ReportStatus::Completed))?;

    let success_rate = if total_analyses > 0 {
        round1(completed_analyses as f64 / total_analyses as f64 * 100.0)
    } else {
        0.0
    };

    let average_seo_score = storage
        .average_completed_score()?
        .map(round1)
        .unwrap_or(0.0);

    let recent_cutoff = Utc::now() - Duration::days(RECENT_DAYS);
    let recent_analyses = storage.count_created_since(recent_cutoff)?;

    let top_urls = storage
        .top_urls(TOP_URL_LIMIT)?
        .into_iter()
        .map(|summary| UrlSummary {
            avg_seo_score: Some(summary.avg_seo_score.map(round1).unwrap_or(0.0)),
            ..summary
        })
        .collect();

    Ok(ReportStatistics {
        total_analyses,
        completed_analyses,
        success_rate,
        average_seo_score,
        recent_analyses,
        top_urls,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &ReportStatistics) {
    println!("=== SiteSage Statistics ===\n");

    println!("Overview:");
    println!("  Total analyses: {}", stats.total_analyses);
    println!("  Completed analyses: {}", stats.completed_analyses);
    println!("  Success rate: {:.1}%", stats.success_rate);
    println!("  Average SEO score: {:.1}", stats.average_seo_score);
    println!(
        "  Analyses in the last {} days: {}",
        RECENT_DAYS, stats.recent_analyses
    );
    println!();

    if !stats.top_urls.is_empty() {
        println!("Top URLs:");
        for summary in &stats.top_urls {
            println!(
                "  {} ({} analyses, average score {:.1})",
                summary.url,
                summary.analysis_count,
                summary.avg_seo_score.unwrap_or(0.0)
            );
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seo::score;
    use crate::storage::{CompletedAnalysis, SqliteStorage};

    fn add_completed(storage: &mut SqliteStorage, url: &str, score_value: u32) {
        let id = storage.create_report(url).unwrap();
        storage.update_status(id, ReportStatus::Processing).unwrap();
        let mut metrics = score("<html></html>", 10, url);
        metrics.score = score_value;
        storage
            .complete_report(
                id,
                &CompletedAnalysis {
                    metrics,
                    load_time_ms: 10,
                    ai_summary: None,
                    ai_recommendations: None,
                },
            )
            .unwrap();
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(50.0), 50.0);
        assert_eq!(round1(0.04), 0.0);
    }

    #[test]
    fn test_statistics_on_empty_database() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let stats = load_statistics(&storage).unwrap();

        assert_eq!(stats.total_analyses, 0);
        assert_eq!(stats.success_rate, 0.0);
        assert_eq!(stats.average_seo_score, 0.0);
        assert!(stats.top_urls.is_empty());
    }

    #[test]
    fn test_statistics_values() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        add_completed(&mut storage, "https://a.com/", 70);
        add_completed(&mut storage, "https://a.com/", 75);
        add_completed(&mut storage, "https://b.com/", 91);
        storage.create_report("https://c.com/").unwrap();

        let stats = load_statistics(&storage).unwrap();

        assert_eq!(stats.total_analyses, 4);
        assert_eq!(stats.completed_analyses, 3);
        assert_eq!(stats.success_rate, 75.0);
        assert_eq!(stats.average_seo_score, 78.7);
        assert_eq!(stats.recent_analyses, 4);
        assert_eq!(stats.top_urls[0].url, "https://a.com/");
        assert_eq!(stats.top_urls[0].analysis_count, 2);
        assert_eq!(stats.top_urls[0].avg_seo_score, Some(72.5));
    }
}
