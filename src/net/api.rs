//! REST endpoint helpers.
//!
//! ERROR HANDLING
//! ==============
//! Endpoint helpers return `Result<_, ApiError>`; page code turns failures
//! into inline messages via `fetch_data`, never panics.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::future::Future;

use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::request::ApiClient;
use super::types::{LoginRequest, LoginResponse, SessionProfile};

const LOGIN_PATH: &str = "/api/auth/login";
const LOGOUT_PATH: &str = "/api/auth/logout";

/// Remote identity validation consulted once at startup.
pub trait IdentityApi {
    /// Validate `token`. `Ok(None)` means the server returned no data.
    fn validate_session(&self, token: &str) -> impl Future<Output = Result<Option<SessionProfile>, ApiError>>;
}

impl IdentityApi for ApiClient {
    async fn validate_session(&self, token: &str) -> Result<Option<SessionProfile>, ApiError> {
        let client = self.clone().with_token(Some(token.to_owned()));
        client.get_json(client.session_path()).await
    }
}

/// Exchange credentials for a token and profile via `POST /api/auth/login`.
///
/// # Errors
///
/// Returns an error if the request fails or credentials are rejected.
pub async fn login(client: &ApiClient, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
    client.post_json(LOGIN_PATH, request).await
}

/// Tell the server the session is over. Failures are logged, not returned:
/// the local session is cleared regardless.
pub async fn logout(client: &ApiClient) {
    if let Err(e) = client.post_empty(LOGOUT_PATH).await {
        leptos::logging::warn!("logout request failed: {e}");
    }
}

/// GET `url` and decode the body, mapping failure to a user-facing message.
///
/// # Errors
///
/// Returns the server's plain-text error body when present, else `error_message`.
pub async fn fetch_data<T: DeserializeOwned>(client: &ApiClient, url: &str, error_message: &str) -> Result<T, String> {
    client
        .get_json(url)
        .await
        .map_err(|e| e.user_message(error_message))
}
