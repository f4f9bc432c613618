//! Session state machine.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use storage::TokenStore;

use crate::error::SessionError;

/// Secret used when none is configured.
pub const DEFAULT_ADMIN_SECRET: &str = "admin";

/// Process-wide session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub is_logged_in: bool,
    /// True until the persisted token has been checked.
    pub loading: bool,
}

impl SessionState {
    pub const LOADING: SessionState = SessionState {
        is_logged_in: false,
        loading: true,
    };
    pub const AUTHENTICATED: SessionState = SessionState {
        is_logged_in: true,
        loading: false,
    };
    pub const UNAUTHENTICATED: SessionState = SessionState {
        is_logged_in: false,
        loading: false,
    };
}

/// When a supplied token is compared against the secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Both startup and login compare the token against the secret.
    #[default]
    Strict,
    /// Only startup compares; login accepts any non-empty token for the
    /// current process, and the next startup rejects a mismatching one.
    Legacy,
}

impl FromStr for ValidationMode {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(ValidationMode::Strict),
            "legacy" => Ok(ValidationMode::Legacy),
            _ => Err(SessionError::UnknownValidationMode(s.to_string())),
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Strict => write!(f, "strict"),
            ValidationMode::Legacy => write!(f, "legacy"),
        }
    }
}

/// Result of a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// No token supplied; nothing changed.
    Ignored,
    /// Token accepted and persisted.
    Accepted,
    /// Token does not match the secret; nothing changed.
    Rejected,
}

impl LoginOutcome {
    fn label(&self) -> &'static str {
        match self {
            LoginOutcome::Ignored => "ignored",
            LoginOutcome::Accepted => "accepted",
            LoginOutcome::Rejected => "rejected",
        }
    }
}

/// Admin session gate backed by a persisted token slot.
pub struct SessionGate {
    store: Arc<dyn TokenStore>,
    secret: String,
    mode: ValidationMode,
    state: RwLock<SessionState>,
    /// Held for the whole of every state transition so the startup check
    /// cannot interleave with a login or logout.
    transition: Mutex<()>,
}

impl SessionGate {
    /// Create a gate in the `loading` state. Nothing is read until
    /// [`SessionGate::initialize`] runs.
    pub fn new(store: Arc<dyn TokenStore>, secret: impl Into<String>, mode: ValidationMode) -> Self {
        Self {
            store,
            secret: secret.into(),
            mode,
            state: RwLock::new(SessionState::LOADING),
            transition: Mutex::new(()),
        }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Current state snapshot.
    pub async fn state(&self) -> SessionState {
        *self.state.read().await
    }

    /// Derive the session from the persisted token.
    ///
    /// A session already settled by a login or logout is left as is.
    pub async fn initialize(&self) -> Result<SessionState, SessionError> {
        let _transition = self.transition.lock().await;
        let current = *self.state.read().await;
        if !current.loading {
            debug!(logged_in = current.is_logged_in, "Session already settled");
            return Ok(current);
        }

        let token = self.store.get().await?;

        let next = if token.as_deref() == Some(self.secret.as_str()) {
            self.store.set(&self.secret).await?;
            SessionState::AUTHENTICATED
        } else {
            if token.is_some() {
                warn!("Persisted session token does not match the configured secret");
            }
            self.store.clear().await?;
            SessionState::UNAUTHENTICATED
        };

        *self.state.write().await = next;
        info!(logged_in = next.is_logged_in, "Session initialized");
        Ok(next)
    }

    /// Attempt to log in with a token.
    pub async fn login(&self, token: Option<&str>) -> Result<LoginOutcome, SessionError> {
        let outcome = self.try_login(token).await?;
        metrics::counter!("session_logins_total", "outcome" => outcome.label()).increment(1);
        Ok(outcome)
    }

    async fn try_login(&self, token: Option<&str>) -> Result<LoginOutcome, SessionError> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Ok(LoginOutcome::Ignored),
        };

        if self.mode == ValidationMode::Strict && token != self.secret {
            warn!("Rejected login with mismatching token");
            return Ok(LoginOutcome::Rejected);
        }

        let _transition = self.transition.lock().await;
        self.store.set(token).await?;
        *self.state.write().await = SessionState::AUTHENTICATED;
        info!(mode = %self.mode, "Admin logged in");
        Ok(LoginOutcome::Accepted)
    }

    /// Clear the persisted token and end the session.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let _transition = self.transition.lock().await;
        self.store.clear().await?;
        *self.state.write().await = SessionState::UNAUTHENTICATED;
        info!("Admin logged out");
        Ok(())
    }

    /// Drop the in-memory session without touching the persisted token.
    pub async fn dispose(&self) {
        let _transition = self.transition.lock().await;
        *self.state.write().await = SessionState::LOADING;
        debug!("Session gate disposed");
    }
}
