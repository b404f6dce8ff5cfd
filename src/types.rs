//! Wire DTOs for the coaching-assistant API.
//!
//! DESIGN
//! ======
//! These mirror the remote service's JSON shapes one-to-one. `User` is
//! treated as opaque identity data: nothing here validates or mutates it.
//! Timestamps stay as the server's strings since no local logic reads them.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Identity record returned by the auth endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned numeric identifier.
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    /// Role name, e.g. `"coach"` or `"analyst"`.
    pub role: String,
    #[serde(default)]
    pub team_id: Option<i64>,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl User {
    /// Name to show in UI: full name when present, else the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Credentials for `POST /auth/login`. Sent form-encoded, not JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The account email; the server's password form calls it `username`.
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

/// Body for `POST /auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
}

/// Successful login/refresh payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

/// Error body returned by the API on non-2xx responses.
///
/// `detail` is usually a string, but request-validation failures carry a
/// list of field errors instead, so it is kept as raw JSON.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// The human-readable message, when `detail` is a non-empty string.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.detail
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .filter(|detail| !detail.is_empty())
    }
}
