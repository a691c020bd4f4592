//! ResQ Core - session and access control for the ResQ dispatch dashboard.
//!
//! This crate holds the stateful core shared by ResQ front-ends:
//!
//! - `session`: the session store (who is logged in, pending login, last error)
//! - `guard`: pure navigation checks gating role-scoped views
//! - `auth`: the authenticator seam and login form validation
//! - `api`: the HTTP authenticator for the ResQ data server
//! - `models`: users and roles
//! - `config`: persisted client configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;
pub mod session;

use std::sync::Arc;

pub use api::{ApiError, HttpAuthenticator};
pub use auth::{AuthError, Authenticator, Credentials, ValidationErrors};
pub use config::Config;
pub use guard::{navigate, GuardDecision, Navigation, Route, UnrecognizedRolePolicy};
pub use models::{Role, User};
pub use session::{LoginTask, SessionPhase, SessionSnapshot, SessionStore};

/// Build a session store that authenticates against the configured server
pub fn session_store(config: &Config) -> Result<SessionStore, ApiError> {
    let authenticator = HttpAuthenticator::new(&config.api_base_url)?;
    Ok(SessionStore::with_login_timeout(
        Arc::new(authenticator),
        config.login_timeout(),
    ))
}
