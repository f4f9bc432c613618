//! JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use field_common::FieldError;
use ingestion::IngestionError;
use session::SessionError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Errors surfaced by the JSON API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Invalid upload: {0}")]
    Upload(String),

    #[error("Admin session required")]
    Unauthorized,

    #[error("Session is still loading")]
    SessionPending,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Field(e) => e.code(),
            ApiError::Ingestion(e) => e.code(),
            ApiError::Session(_) => "SESSION_ERROR",
            ApiError::Upload(_) => "INVALID_UPLOAD",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::SessionPending => "SESSION_PENDING",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Field(e) => StatusCode::from_u16(e.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Ingestion(e) if e.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Ingestion(_) | ApiError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upload(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::SessionPending => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        }
        let body = ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingestion_codes_pass_through() {
        let err = ApiError::from(IngestionError::NoShape);
        assert_eq!(err.code(), "IMPORT_SHAPE_EMPTY");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_field_status_mapping() {
        let err = ApiError::from(FieldError::FieldNotFound("x".into()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "FIELD_NOT_FOUND");
    }
}
