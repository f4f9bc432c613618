//! Common types shared across the field catalog services.

pub mod bbox;
pub mod error;
pub mod field;

pub use bbox::{LatLng, LatLngBounds};
pub use error::{FieldError, FieldResult};
pub use field::{Field, FieldId, FieldSummary, StoredField};
