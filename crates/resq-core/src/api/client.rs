//! HTTP authenticator backed by the dispatch data server.
//!
//! The mock backend has no login endpoint: a login is a filtered read of the
//! `/users` collection, and an empty result means the credentials are wrong.

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use reqwest::{header, Client};
use tracing::{debug, warn};

use crate::auth::{AuthError, Authenticator, Credentials};
use crate::models::User;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL of the json-server used in development
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Collection holding operator accounts
const USERS_PATH: &str = "users";

/// HTTP request timeout in seconds.
/// The session store applies its own, usually shorter, login timeout on top.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Authenticator for the ResQ data server.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpAuthenticator {
    client: Client,
    base_url: String,
}

impl HttpAuthenticator {
    /// Create an authenticator for the server at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create an authenticator sharing an existing connection pool
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the user records matching an email/password pair
    pub async fn find_users(&self, email: &str, password: &str) -> Result<Vec<User>, ApiError> {
        let url = format!("{}/{}", self.base_url, USERS_PATH);
        debug!(url = %url, email = email, "Looking up user");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&[("email", email), ("password", password)])
            .send()
            .await
            // The URL carries the password in its query string
            .map_err(|e| ApiError::NetworkError(e.without_url()))?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .map_err(|e| {
                ApiError::InvalidResponse(format!("Failed to parse users response: {}", e.without_url()))
            })
    }

    /// Resolve credentials into exactly one user
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let users = self.find_users(&credentials.email, &credentials.password).await?;
        let total = users.len();

        // The match must be on the submitted email, whatever filtering the server did
        let user = users
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(&credentials.email))
            .ok_or(AuthError::InvalidCredentials)?;

        if total > 1 {
            warn!(email = %credentials.email, count = total, "Multiple user records matched login");
        }
        Ok(user)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}

impl Authenticator for HttpAuthenticator {
    fn authenticate(&self, credentials: Credentials) -> BoxFuture<'static, Result<User, AuthError>> {
        let this = self.clone();
        async move { this.login(&credentials).await }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::session::SessionStore;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with_users(body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("email", "regulateur@gmail.com"))
            .and(query_param("password", "password"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_authenticate_returns_matching_user() {
        let server = server_with_users(json!([{
            "id": "1",
            "role": "regulateur",
            "name": "Ahmed",
            "email": "regulateur@gmail.com",
            "password": "password"
        }]))
        .await;

        let auth = HttpAuthenticator::new(server.uri()).unwrap();
        let user = auth
            .authenticate(Credentials::new("regulateur@gmail.com", "password"))
            .await
            .unwrap();

        assert_eq!(user.id, "1");
        assert_eq!(user.name, "Ahmed");
        assert_eq!(user.role, Some(Role::Dispatcher));
    }

    #[tokio::test]
    async fn test_authenticate_empty_result_is_invalid_credentials() {
        let server = server_with_users(json!([])).await;

        let auth = HttpAuthenticator::new(format!("{}/", server.uri())).unwrap();
        let err = auth
            .authenticate(Credentials::new("regulateur@gmail.com", "password"))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_authenticate_rejects_record_for_other_email() {
        let server = server_with_users(json!([{
            "id": 2,
            "name": "Omar",
            "email": "chef@resq.ma"
        }]))
        .await;

        let auth = HttpAuthenticator::new(server.uri()).unwrap();
        let err = auth
            .authenticate(Credentials::new("regulateur@gmail.com", "password"))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_authenticate_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let auth = HttpAuthenticator::new(server.uri()).unwrap();
        let err = auth
            .authenticate(Credentials::new("a@b.com", "secret1"))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::Unavailable("maintenance".to_string()));
    }

    #[tokio::test]
    async fn test_authenticate_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let auth = HttpAuthenticator::new(server.uri()).unwrap();
        let err = auth
            .authenticate(Credentials::new("a@b.com", "secret1"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_authenticate_connection_refused() {
        // Port 1 is reserved and nothing listens there in test environments
        let auth = HttpAuthenticator::new("http://127.0.0.1:1").unwrap();
        let err = auth
            .authenticate(Credentials::new("a@b.com", "secret1"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_password() {
        let auth = HttpAuthenticator::new("http://127.0.0.1:1").unwrap();
        let err = auth
            .authenticate(Credentials::new("a@b.com", "hunter22secret"))
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("hunter22secret"));

        let store = SessionStore::new(std::sync::Arc::new(auth));
        let _ = store.login("a@b.com", "hunter22secret").await;
        let stored = store.snapshot().error.unwrap();
        assert!(stored.starts_with("Authentication service unavailable"));
        assert!(!stored.contains("hunter22secret"));
        assert!(!stored.contains("password="));
    }

    #[tokio::test]
    async fn test_malformed_body_error_does_not_leak_password() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let auth = HttpAuthenticator::new(server.uri()).unwrap();
        let err = auth
            .authenticate(Credentials::new("a@b.com", "hunter22secret"))
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("hunter22secret"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let auth = HttpAuthenticator::new("http://localhost:5000/").unwrap();
        assert_eq!(auth.base_url(), DEFAULT_BASE_URL);
    }
}
