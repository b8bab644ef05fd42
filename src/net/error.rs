//! Errors surfaced by the HTTP wrapper.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request timed out after {0} ms")]
    Timeout(u32),
    #[error("server responded {status}")]
    Status { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("not available outside the browser")]
    Unavailable,
}

impl ApiError {
    /// Message to show the user: a non-blank string body from the server wins,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        if let Self::Status { body, .. } = self {
            let trimmed = body.trim();
            if !trimmed.is_empty() && serde_json::from_str::<serde_json::Value>(trimmed).is_err() {
                return trimmed.to_owned();
            }
        }
        fallback.to_owned()
    }
}
