//! HTTP API for submitting analyses and retrieving reports
//!
//! All report endpoints live under `/api/v1/seo-reports`:
//! - `POST /analyze`, `POST /batch-analyze` - submit work
//! - `GET /`, `GET /{id}`, `GET /{id}/pdf` - read reports
//! - `GET /historical`, `GET /stats/summary` - aggregates
//!
//! `GET /health` is served at the root.

mod error;
mod handlers;
mod types;

pub use error::ApiError;
pub use types::{
    AnalyzeRequest, AppState, BatchAnalyzeRequest, ErrorBody, HealthResponse, HistoryQuery,
    ListQuery, ReportList,
};

use crate::SageError;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

/// Path prefix of the report API
pub const API_PREFIX: &str = "/api/v1/seo-reports";

/// Builds the application router
pub fn router(state: AppState) -> Router {
    let path = |suffix: &str| format!("{}{}", API_PREFIX, suffix);

    Router::new()
        .route("/health", get(handlers::health))
        .route(API_PREFIX, get(handlers::list_reports))
        .route(&path("/"), get(handlers::list_reports))
        .route(&path("/analyze"), post(handlers::analyze))
        .route(&path("/batch-analyze"), post(handlers::batch_analyze))
        .route(&path("/historical"), get(handlers::history))
        .route(&path("/stats/summary"), get(handlers::stats_summary))
        .route(&path("/{id}"), get(handlers::get_report))
        .route(&path("/{id}/pdf"), get(handlers::report_pdf))
        .with_state(state)
}

/// Serves the API on an already-bound listener until the process exits
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), SageError> {
    let app = router(state);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Binds `bind` and serves the API
pub async fn start_server(bind: &str, state: AppState) -> Result<(), SageError> {
    let listener = TcpListener::bind(bind).await?;
    let local = listener.local_addr()?;

    tracing::info!("SiteSage API listening on http://{}/", local);
    tracing::info!("  - Reports: http://{}{}", local, API_PREFIX);
    tracing::info!("  - Health: http://{}/health", local);

    serve(listener, state).await
}
