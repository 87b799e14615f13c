use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dictionary::DictionaryError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    /// A query parameter was present but could not be parsed.
    #[error("Invalid query parameter '{name}': {reason}")]
    InvalidParam { name: &'static str, reason: String },
}

impl ApiError {
    pub fn invalid_param(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParam {
            name,
            reason: reason.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidParam { .. } => StatusCode::BAD_REQUEST,
            ApiError::Dictionary(DictionaryError::BadRequest(_)) => StatusCode::BAD_REQUEST,
            ApiError::Dictionary(DictionaryError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Dictionary(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else if status != StatusCode::NOT_FOUND {
            warn!(error = %self, "rejected request");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::from(DictionaryError::NotFound("Word not found: dog".into())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DictionaryError::BadRequest("levels parameter is required".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::invalid_param("page", "expected a positive integer").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DictionaryError::Timeout(Duration::from_secs(5))).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_failures_surface_their_message() {
        let err = ApiError::from(DictionaryError::Timeout(Duration::from_secs(5)));
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code, 500);
        assert_eq!(body.error, "Query timed out after 5s");
    }
}
