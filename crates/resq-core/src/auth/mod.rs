//! Authentication boundary for the session store.
//!
//! This module provides:
//! - `Authenticator`: the external identity collaborator, resolving
//!   credentials into a `User`
//! - `Credentials`: login form input, validated before it reaches the store
//! - `AuthError`: failures surfaced by a login attempt

pub mod authenticator;
pub mod credentials;
pub mod error;

pub use authenticator::Authenticator;
pub use credentials::Credentials;
pub use error::{AuthError, Field, ValidationError, ValidationErrors};
