//! Admin session gate.
//!
//! A boolean admin session derived from comparing a persisted opaque token
//! against one configured secret. The gate is an explicitly constructed
//! service: create it with [`SessionGate::new`], call
//! [`SessionGate::initialize`] once at startup and [`SessionGate::dispose`]
//! on shutdown.

pub mod error;
pub mod gate;
pub mod guard;

pub use error::SessionError;
pub use gate::{LoginOutcome, SessionGate, SessionState, ValidationMode, DEFAULT_ADMIN_SECRET};
pub use guard::{guard_admin, guard_login, Access, LoginAccess, ADMIN_PATH, LOGIN_PATH};
