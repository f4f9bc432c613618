//! Error types for the field catalog services.

use thiserror::Error;

/// Result type alias using FieldError.
pub type FieldResult<T> = Result<T, FieldError>;

/// Primary error type for catalog and presentation operations.
#[derive(Debug, Error)]
pub enum FieldError {
    // === Request Errors ===
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    // === Data Errors ===
    #[error("Invalid shape data: {0}")]
    InvalidShape(String),

    #[error("Invalid table data: {0}")]
    InvalidTable(String),

    // === Storage Errors ===
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl FieldError {
    /// Short machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::MissingParameter(_) => "MISSING_PARAMETER",
            FieldError::InvalidParameter { .. } => "INVALID_PARAMETER",
            FieldError::FieldNotFound(_) => "FIELD_NOT_FOUND",
            FieldError::InvalidShape(_) => "INVALID_SHAPE",
            FieldError::InvalidTable(_) => "INVALID_TABLE",
            FieldError::StorageError(_) => "STORAGE_ERROR",
            FieldError::DatabaseError(_) => "DATABASE_ERROR",
            FieldError::InternalError(_) => "INTERNAL_ERROR",
            FieldError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            FieldError::MissingParameter(_) | FieldError::InvalidParameter { .. } => 400,

            FieldError::FieldNotFound(_) => 404,

            FieldError::InvalidShape(_) | FieldError::InvalidTable(_) => 422,

            FieldError::ServiceUnavailable(_) => 503,

            _ => 500,
        }
    }
}

impl From<std::io::Error> for FieldError {
    fn from(err: std::io::Error) -> Self {
        FieldError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for FieldError {
    fn from(err: serde_json::Error) -> Self {
        FieldError::InternalError(format!("JSON error: {}", err))
    }
}
