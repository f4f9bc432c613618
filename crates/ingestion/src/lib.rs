//! Field ingestion library.
//!
//! Turns a user-supplied shape archive and spreadsheet into a catalog
//! record: the archive becomes a GeoJSON feature array, the spreadsheet an
//! array of row objects keyed by header names.
//!
//! # Architecture
//!
//! Decoding is delegated to two services behind traits so the pipeline only
//! deals with their contracts:
//!
//! - [`ShapeDecoder`]: archive bytes -> GeoJSON, or failure
//!   ([`ZipShapefileDecoder`] reads zipped `.shp`/`.dbf` layers)
//! - [`SpreadsheetReader`]: workbook bytes -> rows of cells, or failure
//!   ([`CalamineSpreadsheetReader`])
//!
//! [`FieldIngester`] runs both and writes the record to a
//! [`storage::FieldCatalog`] only when both succeed.

pub mod archive;
pub mod error;
pub mod ingester;
pub mod metadata;
pub mod shape;
pub mod table;

// Re-exports
pub use archive::ZipShapefileDecoder;
pub use error::{IngestionError, Result, ShapeDecodeError, SpreadsheetError};
pub use ingester::{FieldIngester, FieldSubmission, IngestionResult, ParsedField, UploadedFile};
pub use metadata::{
    accept_attribute, detect_file_type, FileType, SHAPE_ARCHIVE_EXTENSIONS,
    SPREADSHEET_EXTENSIONS,
};
pub use shape::{extract_shapes, DecodedShape, ShapeDecoder};
pub use table::{excel_to_json, rows_to_records, CalamineSpreadsheetReader, Row, SpreadsheetReader};
