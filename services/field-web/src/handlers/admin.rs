//! Guarded admin pages.

use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use metrics::counter;
use tracing::warn;

use session::guard_admin;

use crate::handlers::{blocked_page, upload::read_submission};
use crate::html::{self, FormMessage};
use crate::state::AppState;

/// GET /admin - dashboard
pub async fn admin_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    if let Some(blocked) = blocked_page(guard_admin(state.gate.state().await)) {
        return blocked;
    }
    Html(html::admin_page()).into_response()
}

/// GET /admin/field-creation - upload form
pub async fn field_creation_form_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    if let Some(blocked) = blocked_page(guard_admin(state.gate.state().await)) {
        return blocked;
    }
    Html(html::field_creation_page(None)).into_response()
}

/// POST /admin/field-creation - create a field from the uploaded files
///
/// Every failure shows the same generic message; the classification is only
/// logged.
pub async fn field_creation_submit_handler(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Response {
    if let Some(blocked) = blocked_page(guard_admin(state.gate.state().await)) {
        return blocked;
    }

    let submission = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(e) => {
            warn!(error = %e, "Unreadable field submission");
            return failed_form();
        }
    };

    match state.ingester.ingest(&submission).await {
        Ok(_) => {
            counter!("field_web_form_submissions_total", "outcome" => "success").increment(1);
            Html(html::field_creation_page(Some(FormMessage::Success))).into_response()
        }
        Err(_) => failed_form(),
    }
}

fn failed_form() -> Response {
    counter!("field_web_form_submissions_total", "outcome" => "error").increment(1);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(html::field_creation_page(Some(FormMessage::Error))),
    )
        .into_response()
}
