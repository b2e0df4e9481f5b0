//! Mapping of crate errors onto HTTP responses

use crate::server::types::ErrorBody;
use crate::storage::StorageError;
use crate::SageError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// An error returned from a handler
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<SageError> for ApiError {
    fn from(err: SageError) -> Self {
        match err {
            SageError::Storage(StorageError::ReportNotFound(_)) => {
                Self::new(StatusCode::NOT_FOUND, "Report not found")
            }
            SageError::ReportNotReady { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                "Report analysis is still in progress or failed.",
            ),
            SageError::UrlError(e) => Self::unprocessable(e.to_string()),
            SageError::UrlParse(e) => Self::unprocessable(e.to_string()),
            other => {
                tracing::error!("Request failed: {}", other);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        SageError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ReportStatus;
    use crate::UrlError;

    #[test]
    fn test_not_found_maps_to_404() {
        let err: ApiError = StorageError::ReportNotFound(5).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_ready_maps_to_400() {
        let err: ApiError = SageError::ReportNotReady {
            id: 1,
            status: ReportStatus::Pending,
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_url_maps_to_422() {
        let err: ApiError = SageError::UrlError(UrlError::MissingHost).into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_other_errors_map_to_500() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let err: ApiError = SageError::Io(io).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
