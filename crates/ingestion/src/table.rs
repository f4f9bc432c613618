//! Spreadsheet to row-object conversion.

use std::io::Cursor;
use std::sync::Arc;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use crate::error::{IngestionError, Result, SpreadsheetError};
use crate::ingester::UploadedFile;

/// One worksheet row, cells in column order.
pub type Row = Vec<Value>;

/// Converts workbook bytes into rows of JSON cells.
pub trait SpreadsheetReader: Send + Sync {
    /// Read the first worksheet.
    fn read_rows(&self, data: &[u8]) -> std::result::Result<Vec<Row>, SpreadsheetError>;
}

/// Reads xls, xlsx, xlsb and ods payloads; the format is sniffed from the bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineSpreadsheetReader;

impl CalamineSpreadsheetReader {
    pub fn new() -> Self {
        Self
    }
}

impl SpreadsheetReader for CalamineSpreadsheetReader {
    fn read_rows(&self, data: &[u8]) -> std::result::Result<Vec<Row>, SpreadsheetError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))
            .map_err(|e| SpreadsheetError::Open(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or(SpreadsheetError::NoWorksheet)?
            .map_err(|e| SpreadsheetError::Worksheet(e.to_string()))?;

        Ok(range
            .rows()
            .map(|row| row.iter().map(cell_to_json).collect())
            .collect())
    }
}

fn cell_to_json(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => float_to_json(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => Value::String(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => Value::String(ndt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()),
            None => Value::Null,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
    }
}

fn float_to_json(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        return Value::Number((f as i64).into());
    }
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

/// Turn a header row plus data rows into objects keyed by header name.
///
/// Columns whose header is not a string are dropped. Cells past the end of a
/// short row are omitted.
pub fn rows_to_records(rows: Vec<Row>) -> Vec<Map<String, Value>> {
    let mut rows = rows.into_iter();
    let Some(headers) = rows.next() else {
        return Vec::new();
    };

    let columns: Vec<(usize, String)> = headers
        .into_iter()
        .enumerate()
        .filter_map(|(i, h)| match h {
            Value::String(name) => Some((i, name)),
            _ => None,
        })
        .collect();

    rows.map(|row| {
        let mut record = Map::new();
        for (i, name) in &columns {
            if let Some(cell) = row.get(*i) {
                record.insert(name.clone(), cell.clone());
            }
        }
        record
    })
    .collect()
}

/// Parse the submitted spreadsheet into row objects.
///
/// Every failure, including a missing file, surfaces as
/// [`IngestionError::Spreadsheet`].
pub async fn excel_to_json(
    reader: Arc<dyn SpreadsheetReader>,
    file: Option<&UploadedFile>,
) -> Result<Vec<Map<String, Value>>> {
    let file = file.ok_or(IngestionError::Spreadsheet(SpreadsheetError::Missing))?;
    let data = file.data.clone();

    let rows = tokio::task::spawn_blocking(move || reader.read_rows(&data))
        .await
        .map_err(|e| IngestionError::Spreadsheet(SpreadsheetError::Task(e.to_string())))?
        .map_err(|e| {
            warn!(file = %file.name, error = %e, "Spreadsheet unreadable");
            IngestionError::Spreadsheet(e)
        })?;

    let records = rows_to_records(rows);
    debug!(file = %file.name, rows = records.len(), "Parsed spreadsheet");
    Ok(records)
}
