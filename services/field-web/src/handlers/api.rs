//! JSON API used by the page shim and scripted clients.

use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, Path, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use field_common::{FieldError, FieldId, FieldSummary, StoredField};
use field_map::{MapCommand, MapSurface, TableView, TableWindow};
use ingestion::IngestionResult;
use session::{guard_admin, Access, SessionState};

use crate::error::ApiError;
use crate::handlers::upload::read_submission;
use crate::state::AppState;

async fn load_field(state: &AppState, raw_id: &str) -> Result<StoredField, ApiError> {
    let id: FieldId = raw_id.parse()?;
    state
        .catalog
        .get(id)
        .await?
        .ok_or_else(|| FieldError::FieldNotFound(raw_id.to_string()).into())
}

/// GET /api/fields
pub async fn list_fields_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<FieldSummary>>, ApiError> {
    let fields = state.catalog.query_all().await?;
    Ok(Json(fields.iter().map(StoredField::summary).collect()))
}

/// GET /api/fields/:id
pub async fn get_field_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StoredField>, ApiError> {
    Ok(Json(load_field(&state, &id).await?))
}

/// GET /api/fields/:id/map - viewport command and overlay
pub async fn field_map_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MapCommand>, ApiError> {
    let field = load_field(&state, &id).await?;
    let mut surface = MapSurface::new(state.map_size);
    Ok(Json(surface.select(&field)))
}

#[derive(Debug, Default, Deserialize)]
pub struct RowsQuery {
    #[serde(default)]
    pub scroll_top: f64,
    pub viewport_height: Option<f64>,
}

/// GET /api/fields/:id/rows - visible slice of the field's table
pub async fn field_rows_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<RowsQuery>,
) -> Result<Json<TableWindow>, ApiError> {
    let field = load_field(&state, &id).await?;
    let table = TableView::from_json(&field.field.table, state.table);
    Ok(Json(table.window(query.scroll_top, query.viewport_height)))
}

/// POST /api/fields - create a field (admin session required)
pub async fn create_field_handler(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<IngestionResult>), ApiError> {
    match guard_admin(state.gate.state().await) {
        Access::Allow => {}
        Access::Pending => return Err(ApiError::SessionPending),
        Access::Redirect(_) => return Err(ApiError::Unauthorized),
    }

    let submission = read_submission(multipart).await?;
    let result = state.ingester.ingest(&submission).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /api/session
pub async fn session_handler(Extension(state): Extension<Arc<AppState>>) -> Json<SessionState> {
    Json(state.gate.state().await)
}
