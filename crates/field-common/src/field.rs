//! Field record types.
//!
//! A field is a named geographic area with a vector shape and a tabular
//! dataset. Both payloads are kept as serialized JSON text so the record
//! round-trips through any document store unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::FieldError;

/// Unique identifier assigned by the catalog on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub Uuid);

impl FieldId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FieldId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FieldId {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(FieldId)
            .map_err(|e| FieldError::InvalidParameter {
                param: "field".to_string(),
                message: e.to_string(),
            })
    }
}

/// A field record as written to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub title: String,
    /// Serialized GeoJSON feature array.
    pub shape: String,
    /// Serialized array of row objects.
    pub table: String,
}

impl Field {
    pub fn new(title: impl Into<String>, shape: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            shape: shape.into(),
            table: table.into(),
        }
    }

    /// Build a record by serializing already-parsed shape and table payloads.
    pub fn from_parts<S, T>(title: impl Into<String>, shape: &S, table: &T) -> Result<Self, FieldError>
    where
        S: Serialize + ?Sized,
        T: Serialize + ?Sized,
    {
        Ok(Self {
            title: title.into(),
            shape: serde_json::to_string(shape)?,
            table: serde_json::to_string(table)?,
        })
    }
}

/// A field record together with its catalog metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredField {
    pub id: FieldId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub field: Field,
}

impl StoredField {
    pub fn summary(&self) -> FieldSummary {
        FieldSummary {
            id: self.id,
            title: self.field.title.clone(),
            created_at: self.created_at,
        }
    }
}

/// Listing entry without the heavy payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub id: FieldId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}
