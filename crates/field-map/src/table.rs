//! Virtualized table over a field's row objects.
//!
//! Only the rows intersecting the viewport (plus an overscan margin) are
//! materialized; spacer heights keep the scroll extent at `rows * row_height`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Row geometry and overscan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    pub row_height: f64,
    pub viewport_height: f64,
    pub overscan: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            row_height: 37.0,
            viewport_height: 350.0,
            overscan: 5,
        }
    }
}

/// Display text for one cell.
///
/// Strings are shown verbatim and numbers in shortest form; `null` and
/// booleans render empty, nested values as compact JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Null | Value::Bool(_) => String::new(),
        nested => nested.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub index: usize,
    pub cells: Vec<String>,
}

/// The materialized slice `[start, end)` of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableWindow {
    pub start: usize,
    pub end: usize,
    pub total_rows: usize,
    pub row_height: f64,
    pub top_spacer: f64,
    pub bottom_spacer: f64,
    pub total_height: f64,
    pub rows: Vec<TableRow>,
}

/// Header and cell text of a stored table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    rows: Vec<Vec<String>>,
    #[serde(skip)]
    config: TableConfig,
}

impl TableView {
    /// Build from the serialized row array.
    ///
    /// Headers are the first row's keys; each row renders its own values in
    /// its own key order. Anything other than an array of objects yields an
    /// empty table.
    pub fn from_json(table: &str, config: TableConfig) -> Self {
        let rows: Vec<Value> = match serde_json::from_str(table) {
            Ok(Value::Array(rows)) => rows,
            Ok(_) => {
                warn!("Field table is not an array");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Unable to parse field table");
                Vec::new()
            }
        };

        let headers = rows
            .first()
            .and_then(Value::as_object)
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default();

        let rows = rows
            .iter()
            .map(|row| match row {
                Value::Object(obj) => obj.values().map(cell_text).collect(),
                _ => Vec::new(),
            })
            .collect();

        Self {
            headers,
            rows,
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn total_height(&self) -> f64 {
        self.rows.len() as f64 * self.config.row_height
    }

    /// Materialize the rows visible at `scroll_top` in a viewport of
    /// `viewport_height` (the configured height when `None`).
    pub fn window(&self, scroll_top: f64, viewport_height: Option<f64>) -> TableWindow {
        let n = self.rows.len();
        let rh = self.config.row_height;
        let height = viewport_height.unwrap_or(self.config.viewport_height).max(0.0);
        let scroll_top = scroll_top.max(0.0);

        let first = (scroll_top / rh).floor() as usize;
        let last = ((scroll_top + height) / rh).ceil() as usize;

        let start = first.saturating_sub(self.config.overscan).min(n);
        let end = last.saturating_add(self.config.overscan).min(n).max(start);

        let rows = (start..end)
            .map(|index| TableRow {
                index,
                cells: self.rows[index].clone(),
            })
            .collect();

        TableWindow {
            start,
            end,
            total_rows: n,
            row_height: rh,
            top_spacer: start as f64 * rh,
            bottom_spacer: (n - end) as f64 * rh,
            total_height: self.total_height(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(n: usize) -> TableView {
        let rows: Vec<Value> = (0..n).map(|i| json!({"i": i})).collect();
        TableView::from_json(&Value::Array(rows).to_string(), TableConfig::default())
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("x")), "x");
        assert_eq!(cell_text(&json!(4.2)), "4.2");
        assert_eq!(cell_text(&json!(3)), "3");
        assert_eq!(cell_text(&json!(null)), "");
        assert_eq!(cell_text(&json!(true)), "");
        assert_eq!(cell_text(&json!({"a": [1, 2]})), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_window_at_top() {
        let w = table(100).window(0.0, None);
        // ceil(350 / 37) = 10, plus 5 overscan
        assert_eq!((w.start, w.end), (0, 15));
        assert_eq!(w.top_spacer, 0.0);
        assert_eq!(w.bottom_spacer, 85.0 * 37.0);
        assert_eq!(w.rows.len(), 15);
    }

    #[test]
    fn test_window_scrolled() {
        let w = table(100).window(370.0, Some(350.0));
        // floor(370/37) = 10, ceil(720/37) = 20
        assert_eq!((w.start, w.end), (5, 25));
        assert_eq!(w.rows[0].index, 5);
        assert_eq!(w.top_spacer + w.rows.len() as f64 * 37.0 + w.bottom_spacer, w.total_height);
    }

    #[test]
    fn test_window_past_end() {
        let w = table(10).window(10_000.0, None);
        assert_eq!((w.start, w.end), (10, 10));
        assert!(w.rows.is_empty());
    }

    #[test]
    fn test_unparsable_table_is_empty() {
        let view = TableView::from_json("{oops", TableConfig::default());
        assert!(view.headers.is_empty());
        assert!(view.is_empty());
        assert!(TableView::from_json(r#"{"a":1}"#, TableConfig::default()).is_empty());
    }

    #[test]
    fn test_headers_from_first_row() {
        let view = TableView::from_json(&test_utils::sample_table_json(), TableConfig::default());
        assert_eq!(view.headers, vec!["Plot", "Yield", "Irrigated", "Note"]);
        let w = view.window(0.0, None);
        assert_eq!(w.rows[1].cells, vec!["B", "3", "", "late"]);
    }
}
