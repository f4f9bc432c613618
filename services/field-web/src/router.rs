//! Route table.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{admin, api, health, login, pages};
use crate::state::AppState;

/// Build the application router over shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        // Pages
        .route("/", get(pages::map_page_handler))
        .route("/admin", get(admin::admin_handler))
        .route(
            "/admin/field-creation",
            get(admin::field_creation_form_handler).post(admin::field_creation_submit_handler),
        )
        .route(
            "/login",
            get(login::login_form_handler).post(login::login_submit_handler),
        )
        .route("/logout", post(login::logout_handler))
        // JSON API
        .route("/api/session", get(api::session_handler))
        .route(
            "/api/fields",
            get(api::list_fields_handler).post(api::create_field_handler),
        )
        .route("/api/fields/:id", get(api::get_field_handler))
        .route("/api/fields/:id/map", get(api::field_map_handler))
        .route("/api/fields/:id/rows", get(api::field_rows_handler))
        // Health and metrics
        .route("/health", get(health::health_handler))
        .route("/ready", get(health::ready_handler))
        .route("/metrics", get(health::metrics_handler))
        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
