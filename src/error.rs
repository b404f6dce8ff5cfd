//! Error types for remote auth/data calls.
//!
//! DESIGN
//! ======
//! Every failure a remote call can produce (transport, non-2xx status,
//! unparsable body) collapses into one `AuthError`. The session controller
//! only ever needs the human-readable [`AuthError::message`], while callers
//! that care can still match on the variant.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Generic message used when a failed response carries no usable `detail`.
#[must_use]
pub fn http_error_message(status: u16) -> String {
    format!("HTTP error! status: {status}")
}

/// Errors produced by [`crate::remote::RemoteAuthService`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("{0}")]
    Transport(String),

    /// The remote service answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A success response body could not be decoded.
    #[error("{0}")]
    Parse(String),

    /// A login/refresh response carried an empty access token.
    #[error("server returned an empty access token")]
    MissingToken,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl AuthError {
    /// Normalized, user-facing message. This is what lands in
    /// [`crate::session::Session::error`].
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status for application-level rejections.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` when the server rejected the credential itself.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}
