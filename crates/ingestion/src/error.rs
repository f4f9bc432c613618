//! Error types for the ingestion crate.

use thiserror::Error;

use field_common::FieldError;

/// Errors that can occur during field ingestion.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("IMPORT_UNRECOGNISED_FILE: could not decode '{file}': {source}")]
    UnrecognisedFile {
        file: String,
        #[source]
        source: ShapeDecodeError,
    },

    #[error("EXTRACT_FILE_EMPTY: '{0}' contains no features")]
    EmptyExtract(String),

    #[error("IMPORT_SHAPE_EMPTY: no shape archive supplied")]
    NoShape,

    #[error("Extract went wrong: {0}")]
    ExtractFailed(String),

    #[error("Failed to read Excel file")]
    Spreadsheet(#[source] SpreadsheetError),

    #[error("Failed to build field record: {0}")]
    Record(#[source] FieldError),

    #[error("Failed to store field: {0}")]
    CatalogWrite(#[source] FieldError),
}

impl IngestionError {
    /// Stable classification code surfaced to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            IngestionError::UnrecognisedFile { .. } => "IMPORT_UNRECOGNISED_FILE",
            IngestionError::EmptyExtract(_) => "EXTRACT_FILE_EMPTY",
            IngestionError::NoShape => "IMPORT_SHAPE_EMPTY",
            IngestionError::ExtractFailed(_) => "EXTRACT_FAILED",
            IngestionError::Spreadsheet(_) => "SPREADSHEET_UNREADABLE",
            IngestionError::Record(_) => "RECORD_INVALID",
            IngestionError::CatalogWrite(_) => "CATALOG_WRITE_FAILED",
        }
    }

    /// True when the submitted files are at fault rather than the service.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            IngestionError::ExtractFailed(_) | IngestionError::CatalogWrite(_)
        )
    }
}

/// Failures of the shape decoder service.
#[derive(Error, Debug)]
pub enum ShapeDecodeError {
    #[error("not a readable zip archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to read archive entry: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive entry '{name}' declares {declared} bytes but holds {actual}")]
    EntrySize {
        name: String,
        declared: u64,
        actual: u64,
    },

    #[error("spreadsheet supplied where a shape archive was expected")]
    NotAnArchive,

    #[error("archive contains no .shp layer")]
    NoLayers,

    #[error("invalid .shp data: {0}")]
    InvalidShp(String),

    #[error("invalid .dbf data: {0}")]
    InvalidDbf(String),
}

/// Failures of the spreadsheet service.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("no spreadsheet supplied")]
    Missing,

    #[error("unsupported or corrupt workbook: {0}")]
    Open(String),

    #[error("workbook has no worksheet")]
    NoWorksheet,

    #[error("failed to read worksheet: {0}")]
    Worksheet(String),

    #[error("spreadsheet task failed: {0}")]
    Task(String),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
