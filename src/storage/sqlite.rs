//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::state::ReportStatus;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{format_timestamp, CompletedAnalysis, ReportFilter, ReportRecord, UrlSummary};
use crate::SageError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const REPORT_COLUMNS: &str = "id, url, status, title, meta_description, seo_score, load_time_ms,
     raw_metrics, ai_summary, ai_recommendations, error_message, created_at, updated_at,
     completed_at";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(SageError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, SageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, SageError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn current_status(&self, report_id: i64) -> StorageResult<ReportStatus> {
        let status: Option<String> = self
            .conn
            .query_row(
                "SELECT status FROM reports WHERE id = ?1",
                params![report_id],
                |row| row.get(0),
            )
            .optional()?;

        let status = status.ok_or(StorageError::ReportNotFound(report_id))?;
        Ok(ReportStatus::from_db_string(&status).unwrap_or(ReportStatus::Failed))
    }

    fn ensure_transition(&self, report_id: i64, next: ReportStatus) -> StorageResult<()> {
        let current = self.current_status(report_id)?;
        if !current.can_transition_to(next) {
            return Err(StorageError::InvalidTransition {
                id: report_id,
                from: current,
                to: next,
            });
        }
        Ok(())
    }
}

fn row_to_report(row: &Row<'_>) -> rusqlite::Result<ReportRecord> {
    let raw_metrics: Option<String> = row.get(7)?;
    let recommendations: Option<String> = row.get(9)?;

    Ok(ReportRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        status: ReportStatus::from_db_string(&row.get::<_, String>(2)?)
            .unwrap_or(ReportStatus::Failed),
        title: row.get(3)?,
        meta_description: row.get(4)?,
        seo_score: row
            .get::<_, Option<i64>>(5)?
            .and_then(|score| u32::try_from(score).ok()),
        load_time_ms: row
            .get::<_, Option<i64>>(6)?
            .and_then(|ms| u64::try_from(ms).ok()),
        raw_metrics: raw_metrics.and_then(|json| serde_json::from_str(&json).ok()),
        ai_summary: row.get(8)?,
        ai_recommendations: recommendations.and_then(|json| serde_json::from_str(&json).ok()),
        error_message: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
        completed_at: row.get(13)?,
    })
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

impl Storage for SqliteStorage {
    // ===== Report Lifecycle =====

    fn create_report(&mut self, url: &str) -> StorageResult<i64> {
        let now = format_timestamp(Utc::now());
        self.conn.execute(
            "INSERT INTO reports (url, status, created_at) VALUES (?1, ?2, ?3)",
            params![url, ReportStatus::Pending.to_db_string(), now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_report(&self, report_id: i64) -> StorageResult<ReportRecord> {
        let sql = format!("SELECT {} FROM reports WHERE id = ?1", REPORT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;

        let report = stmt
            .query_row(params![report_id], row_to_report)
            .optional()?;

        report.ok_or(StorageError::ReportNotFound(report_id))
    }

    fn find_completed_by_url(&self, url: &str) -> StorageResult<Option<ReportRecord>> {
        let sql = format!(
            "SELECT {} FROM reports WHERE url = ?1 AND status = ?2
             ORDER BY created_at DESC, id DESC LIMIT 1",
            REPORT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let report = stmt
            .query_row(
                params![url, ReportStatus::Completed.to_db_string()],
                row_to_report,
            )
            .optional()?;

        Ok(report)
    }

    fn update_status(&mut self, report_id: i64, status: ReportStatus) -> StorageResult<()> {
        self.ensure_transition(report_id, status)?;

        let now = format_timestamp(Utc::now());
        self.conn.execute(
            "UPDATE reports SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, report_id],
        )?;
        Ok(())
    }

    fn complete_report(
        &mut self,
        report_id: i64,
        analysis: &CompletedAnalysis,
    ) -> StorageResult<()> {
        self.ensure_transition(report_id, ReportStatus::Completed)?;

        let metrics = &analysis.metrics;
        let raw_metrics = serde_json::to_string(metrics)?;
        let recommendations = analysis
            .ai_recommendations
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let load_time_ms = i64::try_from(analysis.load_time_ms).unwrap_or(i64::MAX);
        let now = format_timestamp(Utc::now());

        self.conn.execute(
            "UPDATE reports SET status = ?1, title = ?2, meta_description = ?3, seo_score = ?4,
             load_time_ms = ?5, raw_metrics = ?6, ai_summary = ?7, ai_recommendations = ?8,
             error_message = NULL, updated_at = ?9, completed_at = ?9 WHERE id = ?10",
            params![
                ReportStatus::Completed.to_db_string(),
                metrics.title,
                metrics.meta_description,
                metrics.score,
                load_time_ms,
                raw_metrics,
                analysis.ai_summary,
                recommendations,
                now,
                report_id
            ],
        )?;
        Ok(())
    }

    fn fail_report(&mut self, report_id: i64, error_message: &str) -> StorageResult<()> {
        self.ensure_transition(report_id, ReportStatus::Failed)?;

        let now = format_timestamp(Utc::now());
        self.conn.execute(
            "UPDATE reports SET status = ?1, error_message = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                ReportStatus::Failed.to_db_string(),
                error_message,
                now,
                report_id
            ],
        )?;
        Ok(())
    }

    // ===== Queries =====

    fn list_reports(&self, filter: &ReportFilter) -> StorageResult<(Vec<ReportRecord>, u64)> {
        let status = filter.status.map(|s| s.to_db_string());
        let url = filter.url_contains.as_deref();

        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reports
             WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR instr(url, ?2) > 0)",
            params![status, url],
            |row| row.get(0),
        )?;

        let sql = format!(
            "SELECT {} FROM reports
             WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR instr(url, ?2) > 0)
             ORDER BY created_at DESC, id DESC LIMIT ?3 OFFSET ?4",
            REPORT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let reports = stmt
            .query_map(
                params![status, url, filter.limit, filter.skip],
                row_to_report,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((reports, to_count(total)))
    }

    fn history_for_url(
        &self,
        url: &str,
        since: DateTime<Utc>,
    ) -> StorageResult<Vec<ReportRecord>> {
        let sql = format!(
            "SELECT {} FROM reports WHERE url = ?1 AND status = ?2 AND created_at >= ?3
             ORDER BY created_at DESC, id DESC",
            REPORT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let reports = stmt
            .query_map(
                params![
                    url,
                    ReportStatus::Completed.to_db_string(),
                    format_timestamp(since)
                ],
                row_to_report,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reports)
    }

    // ===== Statistics =====

    fn count_reports(&self, status: Option<ReportStatus>) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reports WHERE (?1 IS NULL OR status = ?1)",
            params![status.map(|s| s.to_db_string())],
            |row| row.get(0),
        )?;
        Ok(to_count(count))
    }

    fn average_completed_score(&self) -> StorageResult<Option<f64>> {
        let avg: Option<f64> = self.conn.query_row(
            "SELECT AVG(seo_score) FROM reports WHERE status = ?1 AND seo_score IS NOT NULL",
            params![ReportStatus::Completed.to_db_string()],
            |row| row.get(0),
        )?;
        Ok(avg)
    }

    fn count_created_since(&self, since: DateTime<Utc>) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reports WHERE created_at >= ?1",
            params![format_timestamp(since)],
            |row| row.get(0),
        )?;
        Ok(to_count(count))
    }

    fn top_urls(&self, limit: u32) -> StorageResult<Vec<UrlSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT url, COUNT(*) AS analysis_count, AVG(seo_score) FROM reports
             WHERE status = ?1
             GROUP BY url ORDER BY analysis_count DESC, url ASC LIMIT ?2",
        )?;

        let urls = stmt
            .query_map(
                params![ReportStatus::Completed.to_db_string(), limit],
                |row| {
                    Ok(UrlSummary {
                        url: row.get(0)?,
                        analysis_count: to_count(row.get(1)?),
                        avg_seo_score: row.get(2)?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seo::score;

    fn sample_analysis(score_value: u32) -> CompletedAnalysis {
        let mut metrics = score(
            "<html><head><title>A reasonable page title</title></head><body><h1>x</h1></body></html>",
            120,
            "https://example.com",
        );
        metrics.score = score_value;
        CompletedAnalysis {
            metrics,
            load_time_ms: 120,
            ai_summary: Some("Solid page.".to_string()),
            ai_recommendations: Some(vec!["Add a description".to_string()]),
        }
    }

    fn completed_report(storage: &mut SqliteStorage, url: &str, score_value: u32) -> i64 {
        let id = storage.create_report(url).unwrap();
        storage.update_status(id, ReportStatus::Processing).unwrap();
        storage
            .complete_report(id, &sample_analysis(score_value))
            .unwrap();
        id
    }

    #[test]
    fn test_create_in_memory() {
        let storage = SqliteStorage::new_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_create_report_is_pending() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let id = storage.create_report("https://example.com").unwrap();

        let report = storage.get_report(id).unwrap();
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.url, "https://example.com");
        assert!(report.seo_score.is_none());
        assert!(report.completed_at.is_none());
    }

    #[test]
    fn test_get_missing_report() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert!(matches!(
            storage.get_report(42),
            Err(StorageError::ReportNotFound(42))
        ));
    }

    #[test]
    fn test_complete_report_populates_fields() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let id = completed_report(&mut storage, "https://example.com", 70);

        let report = storage.get_report(id).unwrap();
        assert_eq!(report.status, ReportStatus::Completed);
        assert_eq!(report.seo_score, Some(70));
        assert_eq!(report.title.as_deref(), Some("A reasonable page title"));
        assert_eq!(report.meta_description.as_deref(), Some("Missing"));
        assert_eq!(report.load_time_ms, Some(120));
        assert_eq!(report.ai_summary.as_deref(), Some("Solid page."));
        assert_eq!(
            report.ai_recommendations,
            Some(vec!["Add a description".to_string()])
        );
        assert!(report.completed_at.is_some());
        assert_eq!(report.metrics().unwrap().score, 70);
    }

    #[test]
    fn test_complete_requires_processing() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let id = storage.create_report("https://example.com").unwrap();

        let result = storage.complete_report(id, &sample_analysis(90));
        assert!(matches!(
            result,
            Err(StorageError::InvalidTransition {
                from: ReportStatus::Pending,
                to: ReportStatus::Completed,
                ..
            })
        ));
    }

    #[test]
    fn test_fail_report_records_message() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let id = storage.create_report("https://example.com").unwrap();
        storage.update_status(id, ReportStatus::Processing).unwrap();
        storage.fail_report(id, "Failed to fetch URL: boom").unwrap();

        let report = storage.get_report(id).unwrap();
        assert_eq!(report.status, ReportStatus::Failed);
        assert_eq!(
            report.error_message.as_deref(),
            Some("Failed to fetch URL: boom")
        );
        assert!(report.seo_score.is_none());
    }

    #[test]
    fn test_terminal_reports_do_not_move() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let id = completed_report(&mut storage, "https://example.com", 80);

        assert!(storage.fail_report(id, "late failure").is_err());
        assert!(storage.update_status(id, ReportStatus::Processing).is_err());
        assert_eq!(
            storage.get_report(id).unwrap().status,
            ReportStatus::Completed
        );
    }

    #[test]
    fn test_find_completed_by_url_ignores_other_states() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage.create_report("https://example.com").unwrap();
        assert!(storage
            .find_completed_by_url("https://example.com")
            .unwrap()
            .is_none());

        let first = completed_report(&mut storage, "https://example.com", 60);
        let second = completed_report(&mut storage, "https://example.com", 90);

        let found = storage
            .find_completed_by_url("https://example.com")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, second);
        assert_ne!(found.id, first);

        // exact match only
        assert!(storage
            .find_completed_by_url("https://example.com/")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_list_reports_filters_and_paginates() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        for i in 0..5 {
            completed_report(&mut storage, &format!("https://site{}.com", i), 50);
        }
        storage.create_report("https://pending.org").unwrap();

        let (all, total) = storage.list_reports(&ReportFilter::default()).unwrap();
        assert_eq!(total, 6);
        assert_eq!(all.len(), 6);
        // newest first
        assert_eq!(all[0].url, "https://pending.org");

        let completed = ReportFilter {
            status: Some(ReportStatus::Completed),
            skip: 2,
            limit: 2,
            ..Default::default()
        };
        let (page, total) = storage.list_reports(&completed).unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.len(), 2);
        assert!(page.iter().all(|r| r.status == ReportStatus::Completed));

        let by_url = ReportFilter {
            url_contains: Some("site3".to_string()),
            ..Default::default()
        };
        let (matches, total) = storage.list_reports(&by_url).unwrap();
        assert_eq!(total, 1);
        assert_eq!(matches[0].url, "https://site3.com");
    }

    #[test]
    fn test_history_for_url() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        completed_report(&mut storage, "https://example.com", 40);
        completed_report(&mut storage, "https://example.com", 75);
        completed_report(&mut storage, "https://other.com", 99);
        storage.create_report("https://example.com").unwrap();

        let since = Utc::now() - chrono::Duration::days(30);
        let history = storage
            .history_for_url("https://example.com", since)
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].seo_score, Some(75));
        assert_eq!(history[1].seo_score, Some(40));

        let future = Utc::now() + chrono::Duration::days(1);
        assert!(storage
            .history_for_url("https://example.com", future)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_statistics_queries() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        assert_eq!(storage.count_reports(None).unwrap(), 0);
        assert_eq!(storage.average_completed_score().unwrap(), None);

        completed_report(&mut storage, "https://a.com", 60);
        completed_report(&mut storage, "https://a.com", 80);
        completed_report(&mut storage, "https://b.com", 100);
        let failed = storage.create_report("https://c.com").unwrap();
        storage.fail_report(failed, "boom").unwrap();

        assert_eq!(storage.count_reports(None).unwrap(), 4);
        assert_eq!(
            storage.count_reports(Some(ReportStatus::Completed)).unwrap(),
            3
        );
        assert_eq!(storage.average_completed_score().unwrap(), Some(80.0));

        let week_ago = Utc::now() - chrono::Duration::days(7);
        assert_eq!(storage.count_created_since(week_ago).unwrap(), 4);

        let top = storage.top_urls(5).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].url, "https://a.com");
        assert_eq!(top[0].analysis_count, 2);
        assert_eq!(top[0].avg_seo_score, Some(70.0));
    }

    #[test]
    fn test_file_backed_storage_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sitesage.db");

        let id = {
            let mut storage = SqliteStorage::new(&path).unwrap();
            storage.create_report("https://example.com").unwrap()
        };

        let storage = SqliteStorage::new(&path).unwrap();
        assert_eq!(storage.get_report(id).unwrap().url, "https://example.com");
    }
}
