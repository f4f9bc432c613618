//! dBase attribute tables, read through the `dbase` reader bundled with
//! `shapefile`.

use std::fmt::Display;
use std::io::Cursor;

use geojson::JsonObject;
use serde_json::{Number, Value};
use shapefile::dbase::{self, FieldValue};

use crate::error::ShapeDecodeError;

fn invalid(err: impl Display) -> ShapeDecodeError {
    ShapeDecodeError::InvalidDbf(err.to_string())
}

/// Read at most `limit` records as property objects in field order.
///
/// The record count in the header is never used to size anything; reading
/// stops at `limit` or at the first unreadable record.
pub(crate) fn read_attributes(data: &[u8], limit: usize) -> Result<Vec<JsonObject>, ShapeDecodeError> {
    let mut reader = dbase::Reader::new(Cursor::new(data)).map_err(invalid)?;
    let names: Vec<String> = reader
        .fields()
        .iter()
        .map(|field| field.name().to_string())
        .collect();

    let mut objects = Vec::new();
    for record in reader.iter_records().take(limit) {
        let record = record.map_err(invalid)?;
        let properties = names
            .iter()
            .filter_map(|name| {
                record
                    .get(name)
                    .map(|value| (name.clone(), field_value_to_json(value)))
            })
            .collect();
        objects.push(properties);
    }
    Ok(objects)
}

fn number(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        Value::from(value as i64)
    } else {
        Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn field_value_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Character(Some(text)) | FieldValue::Memo(text) => {
            Value::String(text.trim().to_string())
        }
        FieldValue::Character(None) => Value::String(String::new()),
        FieldValue::Numeric(n) => n.map(number).unwrap_or(Value::Null),
        FieldValue::Float(f) => f.map(|f| number(f64::from(f))).unwrap_or(Value::Null),
        FieldValue::Double(f) | FieldValue::Currency(f) => number(*f),
        FieldValue::Integer(i) => Value::from(*i),
        FieldValue::Logical(b) => b.map(Value::Bool).unwrap_or(Value::Null),
        FieldValue::Date(Some(date)) => Value::String(format!(
            "{:04}-{:02}-{:02}T00:00:00.000Z",
            date.year(),
            date.month(),
            date.day()
        )),
        _ => Value::Null,
    }
}
