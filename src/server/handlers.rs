//! Request handlers for the report API

use crate::analysis::{BatchSubmission, Submission};
use crate::output::{self, history::DEFAULT_HISTORY_DAYS, ReportStatistics, UrlHistory};
use crate::server::error::ApiError;
use crate::server::types::{
    AnalyzeRequest, AppState, BatchAnalyzeRequest, HealthResponse, HistoryQuery, ListQuery,
    ReportList,
};
use crate::state::ReportStatus;
use crate::storage::{ReportFilter, ReportRecord, Storage, MAX_PAGE_SIZE};
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// `POST /analyze`
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Submission>, ApiError> {
    let submission = state
        .analyzer
        .submit(&request.url, request.include_ai_insights)?;
    Ok(Json(submission))
}

/// `POST /batch-analyze`
pub async fn batch_analyze(
    State(state): State<AppState>,
    Json(request): Json<BatchAnalyzeRequest>,
) -> Result<Json<BatchSubmission>, ApiError> {
    let batch = state
        .analyzer
        .submit_batch(&request.urls, request.include_ai_insights)?;
    Ok(Json(batch))
}

/// `GET /{id}`
pub async fn get_report(
    State(state): State<AppState>,
    Path(report_id): Path<i64>,
) -> Result<Json<ReportRecord>, ApiError> {
    let report = state.storage().get_report(report_id)?;
    Ok(Json(report))
}

/// `GET /`
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ReportList>, ApiError> {
    if query.limit == 0 || query.limit > MAX_PAGE_SIZE {
        return Err(ApiError::unprocessable(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            ReportStatus::from_db_string(raw)
                .ok_or_else(|| ApiError::unprocessable(format!("Unknown status: {}", raw)))?,
        ),
        None => None,
    };

    let filter = ReportFilter {
        status,
        url_contains: query.url.filter(|u| !u.is_empty()),
        skip: query.skip,
        limit: query.limit,
    };

    let (reports, total) = state.storage().list_reports(&filter)?;

    Ok(Json(ReportList {
        reports,
        total,
        page: filter.page(),
        per_page: filter.limit,
    }))
}

/// `GET /{id}/pdf`
pub async fn report_pdf(
    State(state): State<AppState>,
    Path(report_id): Path<i64>,
) -> Result<Response, ApiError> {
    let report = state.storage().get_report(report_id)?;
    let rendered = output::render_report(&report)?;

    tracing::info!("Serving PDF for report {} as {}", report_id, rendered.filename);

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", rendered.filename),
            ),
        ],
        rendered.bytes,
    )
        .into_response())
}

/// `GET /historical`
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<UrlHistory>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    let storage = state.storage();
    let history = output::load_history(&*storage, &query.url, days)?;
    Ok(Json(history))
}

/// `GET /stats/summary`
pub async fn stats_summary(
    State(state): State<AppState>,
) -> Result<Json<ReportStatistics>, ApiError> {
    let storage = state.storage();
    let stats = output::load_statistics(&*storage)?;
    Ok(Json(stats))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
