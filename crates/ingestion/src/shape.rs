//! Shape archive extraction.
//!
//! Every submitted archive is decoded on the blocking pool; the results are
//! then scanned in submission order and the first non-empty feature list
//! wins. There is no merging across archives.

use std::sync::Arc;

use futures::future::join_all;
use geojson::{Feature, FeatureCollection};
use tracing::{debug, warn};

use crate::error::{IngestionError, Result, ShapeDecodeError};
use crate::ingester::UploadedFile;
use crate::metadata::FileType;

/// Payload produced by a [`ShapeDecoder`].
#[derive(Debug, Clone)]
pub enum DecodedShape {
    /// A single-layer archive.
    Collection(FeatureCollection),
    /// A multi-layer archive; one collection per layer.
    Layers(Vec<FeatureCollection>),
}

impl DecodedShape {
    /// The top-level feature list, if the payload has one.
    ///
    /// Multi-layer payloads have no top-level features.
    pub fn into_features(self) -> Option<Vec<Feature>> {
        match self {
            DecodedShape::Collection(fc) => Some(fc.features),
            DecodedShape::Layers(_) => None,
        }
    }
}

/// Converts archive bytes into GeoJSON.
pub trait ShapeDecoder: Send + Sync {
    fn decode(&self, data: &[u8]) -> std::result::Result<DecodedShape, ShapeDecodeError>;

    fn name(&self) -> &'static str {
        "shape-decoder"
    }
}

/// Decode all archives concurrently and pick the first usable feature list.
pub async fn extract_shapes(
    decoder: Arc<dyn ShapeDecoder>,
    files: &[UploadedFile],
) -> Result<Vec<Feature>> {
    if files.is_empty() {
        return Err(IngestionError::NoShape);
    }

    let tasks = files.iter().map(|file| {
        let decoder = decoder.clone();
        let data = file.data.clone();
        let file_type = file.file_type();
        tokio::task::spawn_blocking(move || {
            // Workbooks are zip containers too; classify them without decoding.
            if file_type == FileType::Spreadsheet {
                return Err(ShapeDecodeError::NotAnArchive);
            }
            decoder.decode(&data)
        })
    });
    let outcomes = join_all(tasks).await;

    let mut first_error: Option<IngestionError> = None;
    for (file, outcome) in files.iter().zip(outcomes) {
        let decoded = match outcome {
            Ok(decoded) => decoded,
            Err(join_err) => {
                warn!(file = %file.name, error = %join_err, "Shape decode task failed");
                return Err(IngestionError::ExtractFailed(join_err.to_string()));
            }
        };

        let classified = match decoded {
            Ok(shape) => match shape.into_features() {
                Some(features) if !features.is_empty() => {
                    debug!(
                        file = %file.name,
                        features = features.len(),
                        decoder = decoder.name(),
                        "Extracted shape features"
                    );
                    return Ok(features);
                }
                _ => IngestionError::EmptyExtract(file.name.clone()),
            },
            Err(source) => IngestionError::UnrecognisedFile {
                file: file.name.clone(),
                source,
            },
        };

        warn!(file = %file.name, code = classified.code(), "Shape archive rejected");
        first_error.get_or_insert(classified);
    }

    Err(first_error.unwrap_or(IngestionError::NoShape))
}
