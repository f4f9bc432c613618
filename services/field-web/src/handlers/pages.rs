//! Catalog and map page.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::Html,
};
use metrics::counter;
use serde::Deserialize;
use tracing::{error, warn};

use field_common::{FieldId, FieldSummary, StoredField};
use field_map::{MapSurface, SelectionState, TableView, ViewMode};

use crate::html::{self, SelectedField};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MapPageQuery {
    pub field: Option<String>,
    pub view: Option<String>,
}

/// GET / - field list, selected field table and map
pub async fn map_page_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<MapPageQuery>,
) -> Html<String> {
    counter!("field_web_page_views_total", "page" => "map").increment(1);

    let fields = match state.catalog.query_all().await {
        Ok(fields) => fields,
        Err(e) => {
            error!(error = %e, "Failed to load field catalog");
            Vec::new()
        }
    };

    let requested = query.field.as_deref().and_then(|raw| match raw.parse::<FieldId>() {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(field = %raw, error = %e, "Ignoring invalid field selection");
            None
        }
    });
    let selected: Option<&StoredField> =
        requested.and_then(|id| fields.iter().find(|f| f.id == id));

    let mut selection = SelectionState::default();
    if let Some(field) = selected {
        selection.select(field.id);
    }
    if let Some(view) = query.view.as_deref().and_then(|v| v.parse::<ViewMode>().ok()) {
        selection.view = view;
    }

    let mut surface = MapSurface::new(state.map_size);
    let command = match selected {
        Some(field) => surface.select(field),
        None => surface.deselect(),
    };

    let detail = selected.map(|field| {
        let table = TableView::from_json(&field.field.table, state.table);
        let window = table.window(0.0, None);
        (field, table, window)
    });
    let selected_view = detail.as_ref().map(|(field, table, window)| SelectedField {
        field: *field,
        table,
        window,
    });

    let summaries: Vec<FieldSummary> = fields.iter().map(StoredField::summary).collect();
    Html(html::map_page(
        &summaries,
        &selection,
        selected_view.as_ref(),
        &command,
    ))
}
