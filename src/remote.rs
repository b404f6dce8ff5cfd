//! The remote authentication service seam.
//!
//! [`crate::api::ApiClient`] is the HTTP implementation; tests substitute
//! in-memory fakes.

use crate::error::AuthError;
use crate::types::{AuthResponse, LoginRequest, SignupRequest, User};

/// Operations the session controller needs from the auth backend.
///
/// Implementations are responsible for attaching the current credential to
/// calls that need it (`current_user`, `logout`, `refresh`). They must not
/// persist tokens themselves; the session controller owns that decision.
#[async_trait::async_trait]
pub trait RemoteAuthService: Send + Sync {
    /// Exchange credentials for a token and the user record.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] on rejected credentials or transport failure.
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, AuthError>;

    /// Register a new account. No token is issued.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the server rejects the registration.
    async fn signup(&self, user: &SignupRequest) -> Result<User, AuthError>;

    /// Resolve the user behind the current credential.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the credential is missing, invalid or
    /// expired.
    async fn current_user(&self) -> Result<User, AuthError>;

    /// Best-effort server-side invalidation.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the call fails; callers log and ignore it.
    async fn logout(&self) -> Result<(), AuthError>;

    /// Trade the current credential for a fresh one.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the current credential is not accepted.
    async fn refresh(&self) -> Result<AuthResponse, AuthError>;
}
