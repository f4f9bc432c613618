//! Field ingestion pipeline.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use geojson::Feature;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use field_common::{Field, FieldId};
use storage::FieldCatalog;

use crate::archive::ZipShapefileDecoder;
use crate::error::{IngestionError, Result};
use crate::metadata::{detect_file_type, FileType};
use crate::shape::{extract_shapes, ShapeDecoder};
use crate::table::{excel_to_json, CalamineSpreadsheetReader, SpreadsheetReader};

/// A file received from the upload form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name.
    pub name: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn file_type(&self) -> FileType {
        detect_file_type(&self.name)
    }
}

/// Everything a user submits to create one field.
#[derive(Debug, Clone, Default)]
pub struct FieldSubmission {
    pub title: String,
    /// Shape archives in submission order.
    pub shape_files: Vec<UploadedFile>,
    pub table_file: Option<UploadedFile>,
}

/// Outcome of a successful ingestion.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionResult {
    pub id: FieldId,
    pub title: String,
    pub feature_count: usize,
    pub row_count: usize,
}

/// Parsed payloads ready to be serialized into a [`Field`].
#[derive(Debug, Clone)]
pub struct ParsedField {
    pub title: String,
    pub features: Vec<Feature>,
    pub rows: Vec<Map<String, Value>>,
}

impl ParsedField {
    pub fn to_field(&self) -> Result<Field> {
        Field::from_parts(self.title.clone(), &self.features, &self.rows)
            .map_err(IngestionError::Record)
    }
}

/// Turns submissions into catalog records.
pub struct FieldIngester {
    shapes: Arc<dyn ShapeDecoder>,
    sheets: Arc<dyn SpreadsheetReader>,
    catalog: Arc<dyn FieldCatalog>,
}

impl FieldIngester {
    /// Create an ingester with the bundled zip shapefile and calamine decoders.
    pub fn new(catalog: Arc<dyn FieldCatalog>) -> Self {
        Self::with_decoders(
            catalog,
            Arc::new(ZipShapefileDecoder::new()),
            Arc::new(CalamineSpreadsheetReader::new()),
        )
    }

    pub fn with_decoders(
        catalog: Arc<dyn FieldCatalog>,
        shapes: Arc<dyn ShapeDecoder>,
        sheets: Arc<dyn SpreadsheetReader>,
    ) -> Self {
        Self {
            shapes,
            sheets,
            catalog,
        }
    }

    /// Decode both inputs without touching the catalog.
    ///
    /// Shape extraction and spreadsheet parsing run concurrently; shape
    /// errors take precedence when both fail.
    pub async fn parse(&self, submission: &FieldSubmission) -> Result<ParsedField> {
        let (features, rows) = tokio::join!(
            extract_shapes(self.shapes.clone(), &submission.shape_files),
            excel_to_json(self.sheets.clone(), submission.table_file.as_ref()),
        );

        Ok(ParsedField {
            title: submission.title.clone(),
            features: features?,
            rows: rows?,
        })
    }

    /// Parse a submission and write it to the catalog.
    ///
    /// Nothing is written unless both the shape and the table parse.
    pub async fn ingest(&self, submission: &FieldSubmission) -> Result<IngestionResult> {
        let start = Instant::now();
        let outcome = self.ingest_inner(submission).await;
        metrics::histogram!("field_ingest_duration_seconds").record(start.elapsed().as_secs_f64());

        match &outcome {
            Ok(result) => {
                metrics::counter!("fields_created_total").increment(1);
                info!(
                    id = %result.id,
                    title = %result.title,
                    features = result.feature_count,
                    rows = result.row_count,
                    "Field created"
                );
            }
            Err(e) => {
                metrics::counter!("field_ingest_failures_total", "code" => e.code()).increment(1);
                warn!(title = %submission.title, code = e.code(), error = %e, "Field ingestion failed");
            }
        }

        outcome
    }

    async fn ingest_inner(&self, submission: &FieldSubmission) -> Result<IngestionResult> {
        let parsed = self.parse(submission).await?;
        let field = parsed.to_field()?;

        let id = self
            .catalog
            .create(&field)
            .await
            .map_err(IngestionError::CatalogWrite)?;

        Ok(IngestionResult {
            id,
            title: parsed.title,
            feature_count: parsed.features.len(),
            row_count: parsed.rows.len(),
        })
    }
}
