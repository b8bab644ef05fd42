//! Wire DTOs for the identity and login endpoints.
//!
//! DESIGN
//! ======
//! Field names follow the backend's camelCase JSON. User ids are accepted as
//! either strings or numbers and normalized to strings.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};

/// User profile returned by session validation and login.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProfile {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Raw role name as the server spells it.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// Set by the server when the presented token is no longer valid.
    #[serde(default)]
    pub expired: bool,
}

impl SessionProfile {
    /// True when the payload carries no identity at all.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.username.is_none() && self.email.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: SessionProfile,
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!("invalid user id: {other}"))),
    }
}

/// A class the current user is enrolled in or teaches.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ClassItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}
