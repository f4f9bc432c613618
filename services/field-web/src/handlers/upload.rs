//! Multipart upload parsing shared by the form and the JSON API.

use axum::extract::Multipart;
use tracing::debug;

use ingestion::{FieldSubmission, UploadedFile};

use crate::error::ApiError;

pub const TITLE_FIELD: &str = "title";
pub const SHAPE_FILE_FIELD: &str = "shapeFile";
pub const TABLE_FILE_FIELD: &str = "tableFile";

/// Collect the submission parts. `shapeFile` may repeat; empty file parts
/// (a file input left blank) are skipped.
pub async fn read_submission(mut multipart: Multipart) -> Result<FieldSubmission, ApiError> {
    let mut submission = FieldSubmission::default();

    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Upload(e.to_string()))?
    {
        let name = part.name().unwrap_or_default().to_string();
        match name.as_str() {
            TITLE_FIELD => {
                submission.title = part
                    .text()
                    .await
                    .map_err(|e| ApiError::Upload(e.to_string()))?;
            }
            SHAPE_FILE_FIELD | TABLE_FILE_FIELD => {
                let file_name = part.file_name().unwrap_or_default().to_string();
                let data = part
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Upload(e.to_string()))?;
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }

                debug!(part = %name, file = %file_name, size = data.len(), "Received upload");
                let file = UploadedFile::new(file_name, data);
                if name == SHAPE_FILE_FIELD {
                    submission.shape_files.push(file);
                } else {
                    submission.table_file = Some(file);
                }
            }
            other => debug!(part = %other, "Ignoring unknown form part"),
        }
    }

    Ok(submission)
}
