//! Thin HTTP wrapper shared by every REST call.
//!
//! SYSTEM CONTEXT
//! ==============
//! Attaches the bearer token when one is held, bounds each request with the
//! configured timeout, and logs failed responses before handing callers a
//! typed `ApiError`. Browser-only: outside the `csr` build every request
//! resolves to `ApiError::Unavailable`.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::config::ClientConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
    timeout_ms: u32,
    session_path: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout_ms: config.request_timeout_ms,
            session_path: config.session_path.clone(),
            token: None,
        }
    }

    /// Attach a bearer token. Empty tokens are treated as absent.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn session_path(&self) -> &str {
        &self.session_path
    }

    /// Join `path` onto the base URL. Absolute URLs pass through untouched.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        if self.base_url.is_empty() {
            return path.to_owned();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Value of the `Authorization` header, if a token is held.
    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, non-2xx status, or an
    /// undecodable body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        #[cfg(feature = "csr")]
        {
            let url = self.url(path);
            let mut builder = gloo_net::http::Request::get(&url);
            if let Some(auth) = self.authorization() {
                builder = builder.header("Authorization", &auth);
            }
            let request = builder.build().map_err(|e| ApiError::Transport(e.to_string()))?;
            let body = self.dispatch(&url, request).await?;
            decode_body(&body)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = path;
            Err(ApiError::Unavailable)
        }
    }

    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, non-2xx status, or an
    /// undecodable body.
    pub async fn post_json<B, T>(&self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        #[cfg(feature = "csr")]
        {
            let url = self.url(path);
            let mut builder = gloo_net::http::Request::post(&url);
            if let Some(auth) = self.authorization() {
                builder = builder.header("Authorization", &auth);
            }
            let request = builder
                .json(payload)
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            let body = self.dispatch(&url, request).await?;
            decode_body(&body)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (path, payload);
            Err(ApiError::Unavailable)
        }
    }

    /// POST without a body, discarding the response body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, or non-2xx status.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        #[cfg(feature = "csr")]
        {
            let url = self.url(path);
            let mut builder = gloo_net::http::Request::post(&url);
            if let Some(auth) = self.authorization() {
                builder = builder.header("Authorization", &auth);
            }
            let request = builder.build().map_err(|e| ApiError::Transport(e.to_string()))?;
            self.dispatch(&url, request).await.map(|_| ())
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = path;
            Err(ApiError::Unavailable)
        }
    }

    #[cfg(feature = "csr")]
    async fn dispatch(&self, url: &str, request: gloo_net::http::Request) -> Result<String, ApiError> {
        use futures::future::{Either, select};

        let send = Box::pin(request.send());
        let timeout = gloo_timers::future::TimeoutFuture::new(self.timeout_ms);
        let resp = match select(send, timeout).await {
            Either::Left((Ok(resp), _)) => resp,
            Either::Left((Err(e), _)) => {
                leptos::logging::warn!("request error: url={url} error={e}");
                return Err(ApiError::Transport(e.to_string()));
            }
            Either::Right(((), _)) => {
                leptos::logging::warn!("request timeout: url={url} after={}ms", self.timeout_ms);
                return Err(ApiError::Timeout(self.timeout_ms));
            }
        };
        let status = resp.status();
        let body = resp.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        if !resp.ok() {
            leptos::logging::warn!("request failed: url={url} status={status} body={body}");
            return Err(ApiError::Status { status, body });
        }
        Ok(body)
    }
}

/// Decode a response body. An empty body decodes as JSON `null`.
#[cfg(any(test, feature = "csr"))]
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}
