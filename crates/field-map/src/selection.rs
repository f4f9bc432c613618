//! Which field is selected and which pane narrow screens show.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use field_common::{FieldError, FieldId};

/// Below this width only one pane is visible at a time.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Map,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Table => write!(f, "table"),
            ViewMode::Map => write!(f, "map"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(ViewMode::Table),
            "map" => Ok(ViewMode::Map),
            other => Err(FieldError::InvalidParameter {
                param: "view".to_string(),
                message: format!("expected 'table' or 'map', got '{}'", other),
            }),
        }
    }
}

/// Selection owned by the map page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected_field: Option<FieldId>,
    pub view: ViewMode,
}

impl SelectionState {
    /// Select a field; narrow screens switch to the map.
    pub fn select(&mut self, id: FieldId) {
        self.selected_field = Some(id);
        self.view = ViewMode::Map;
    }

    /// Go back to the list; narrow screens switch to the table.
    pub fn back(&mut self) {
        self.selected_field = None;
        self.view = ViewMode::Table;
    }

    /// Catalog reloaded: nothing selected.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_selected(&self, id: FieldId) -> bool {
        self.selected_field == Some(id)
    }
}
