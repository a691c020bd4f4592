use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::api::ApiError;

/// Failure of a single login attempt.
///
/// The `Display` text is stored verbatim in the session's `error` field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication service unavailable: {0}")]
    Unavailable(String),

    #[error("Login timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unexpected authentication response: {0}")]
    InvalidResponse(String),

    #[error("Login attempt aborted: {0}")]
    Aborted(String),

    /// Rejection carrying a message chosen by the authenticator
    #[error("{0}")]
    Rejected(String),
}

impl AuthError {
    /// Short message suitable for a login form banner
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials => "Invalid email or password".to_string(),
            AuthError::Unavailable(_) => {
                "Unable to connect to server. Check your connection.".to_string()
            }
            AuthError::Timeout(_) => "Connection timed out. Please try again.".to_string(),
            other => format!("Login failed: {}", other),
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized | ApiError::AccessDenied(_) => AuthError::InvalidCredentials,
            // The request URL carries the password in its query string
            ApiError::NetworkError(e) => AuthError::Unavailable(e.without_url().to_string()),
            ApiError::ServerError(body) => AuthError::Unavailable(body),
            ApiError::RateLimited => AuthError::Unavailable(ApiError::RateLimited.to_string()),
            other => AuthError::InvalidResponse(other.to_string()),
        }
    }
}

/// Login form field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: &'static str,
}

/// All field errors found in one form submission
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn for_field(&self, field: Field) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_stored_message() {
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
        assert_eq!(AuthError::Rejected("Compte suspendu".into()).to_string(), "Compte suspendu");
        assert_eq!(
            AuthError::Timeout(Duration::from_secs(15)).to_string(),
            "Login timed out after 15s"
        );
    }

    #[test]
    fn test_from_api_error() {
        assert_eq!(AuthError::from(ApiError::Unauthorized), AuthError::InvalidCredentials);
        assert_eq!(
            AuthError::from(ApiError::ServerError("boom".into())),
            AuthError::Unavailable("boom".into())
        );
        assert!(matches!(
            AuthError::from(ApiError::NotFound("/users".into())),
            AuthError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_user_message() {
        assert_eq!(AuthError::InvalidCredentials.user_message(), "Invalid email or password");
        assert!(AuthError::Aborted("panicked".into()).user_message().starts_with("Login failed:"));
    }
}
