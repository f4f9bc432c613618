//! Route guards built on the session state.

use crate::gate::SessionState;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Where authenticated visitors of the login view are sent.
pub const ADMIN_PATH: &str = "/admin";

/// Decision for a guarded admin route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The initial session check has not finished; show a waiting indicator.
    Pending,
    Allow,
    Redirect(&'static str),
}

/// Decision for the login view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAccess {
    Pending,
    ShowForm,
    Redirect(&'static str),
}

pub fn guard_admin(state: SessionState) -> Access {
    if state.loading {
        Access::Pending
    } else if state.is_logged_in {
        Access::Allow
    } else {
        Access::Redirect(LOGIN_PATH)
    }
}

pub fn guard_login(state: SessionState) -> LoginAccess {
    if state.loading {
        LoginAccess::Pending
    } else if state.is_logged_in {
        LoginAccess::Redirect(ADMIN_PATH)
    } else {
        LoginAccess::ShowForm
    }
}
