//! HTTP request handlers for the field web service.

pub mod admin;
pub mod api;
pub mod health;
pub mod login;
pub mod pages;
pub mod upload;

use axum::response::{Html, IntoResponse, Redirect, Response};
use session::Access;

use crate::html;

/// Response for a guarded page that must not render, or `None` when the
/// visitor may proceed.
pub(crate) fn blocked_page(access: Access) -> Option<Response> {
    match access {
        Access::Allow => None,
        Access::Pending => Some(Html(html::loading_page()).into_response()),
        Access::Redirect(to) => Some(Redirect::to(to).into_response()),
    }
}
