//! Login and logout.

use std::sync::Arc;

use axum::{
    extract::{Extension, Form},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use session::{guard_login, LoginAccess, LoginOutcome, ADMIN_PATH, LOGIN_PATH};

use crate::error::ApiError;
use crate::html;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub token: Option<String>,
}

/// GET /login - token form, or straight to the dashboard when logged in
pub async fn login_form_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    match guard_login(state.gate.state().await) {
        LoginAccess::Pending => Html(html::loading_page()).into_response(),
        LoginAccess::Redirect(to) => Redirect::to(to).into_response(),
        LoginAccess::ShowForm => Html(html::login_page(false)).into_response(),
    }
}

/// POST /login
///
/// Submissions are held at the loading page until the startup session check
/// has settled.
pub async fn login_submit_handler(
    Extension(state): Extension<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    match guard_login(state.gate.state().await) {
        LoginAccess::Pending => return Ok(Html(html::loading_page()).into_response()),
        LoginAccess::Redirect(to) => return Ok(Redirect::to(to).into_response()),
        LoginAccess::ShowForm => {}
    }

    let outcome = state.gate.login(form.token.as_deref()).await?;

    Ok(match outcome {
        LoginOutcome::Accepted => Redirect::to(ADMIN_PATH).into_response(),
        LoginOutcome::Rejected => {
            (StatusCode::UNAUTHORIZED, Html(html::login_page(true))).into_response()
        }
        LoginOutcome::Ignored => Html(html::login_page(false)).into_response(),
    })
}

/// POST /logout
pub async fn logout_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Redirect, ApiError> {
    state.gate.logout().await?;
    Ok(Redirect::to(LOGIN_PATH))
}
