//! Error types for the session gate.

use thiserror::Error;

use field_common::FieldError;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Token storage failed: {0}")]
    TokenStorage(#[from] FieldError),

    #[error("Unknown validation mode: {0} (expected 'strict' or 'legacy')")]
    UnknownValidationMode(String),
}
