//! Client-side session lifecycle: login, signup, logout, hydration.
//!
//! ARCHITECTURE
//! ============
//! `SessionController` is the only writer of the in-memory [`Session`]
//! (`user`, `loading`, `error`) and the only caller that changes the
//! persisted credential in [`SessionStore`]. Observers read the session
//! through a `tokio::sync::watch` channel. Every transition is published
//! before the operation's future resolves, so code awaiting an operation
//! sees state that already reflects it.
//!
//! ERROR HANDLING
//! ==============
//! Failures reach callers differently per operation:
//! - `login`/`signup`/`refresh` failures are written to `Session::error` and
//!   also returned to the caller.
//! - `logout` failures are logged; the local session is cleared regardless.
//! - hydration failures are silent: the stale credential is dropped and the
//!   session stays anonymous with no error.
//!
//! `loading` is reset by a drop guard, so it also returns to `false` when an
//! operation's future is dropped mid-flight.
//!
//! Overlapping mutating calls are last-writer-wins. Hosts should not start a
//! second operation while `loading` is set.


use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::AuthError;
use crate::remote::RemoteAuthService;
use crate::store::SessionStore;
use crate::types::{AuthResponse, LoginRequest, SignupRequest, User};

// =============================================================================
// SESSION
// =============================================================================

/// In-memory projection of "who is logged in".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Coarse lifecycle state derived from a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Anonymous,
    Authenticating,
    Authenticated,
    Failed,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Authenticating
        } else if self.user.is_some() {
            SessionPhase::Authenticated
        } else if self.error.is_some() {
            SessionPhase::Failed
        } else {
            SessionPhase::Anonymous
        }
    }
}

/// Resets `loading` when an operation ends without reaching `finish`
/// (early return, panic, or the future being dropped).
struct Pending<'a> {
    state: &'a watch::Sender<Session>,
    done: bool,
}

impl Pending<'_> {
    fn finish(mut self, apply: impl FnOnce(&mut Session)) {
        self.done = true;
        self.state.send_modify(|session| {
            apply(session);
            session.loading = false;
        });
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.state.send_modify(|session| session.loading = false);
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Mediates every identity-changing operation for one client.
pub struct SessionController {
    store: SessionStore,
    remote: Arc<dyn RemoteAuthService>,
    state: watch::Sender<Session>,
    hydrated: AtomicBool,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("store", &self.store)
            .field("session", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl SessionController {
    /// Build an idle controller. Nothing is restored until
    /// [`SessionController::hydrate`] runs; `loading` stays `false` until then.
    #[must_use]
    pub fn new(store: SessionStore, remote: Arc<dyn RemoteAuthService>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self { store, remote, state, hydrated: AtomicBool::new(false) }
    }

    /// Build a controller and run startup hydration.
    pub async fn connect(store: SessionStore, remote: Arc<dyn RemoteAuthService>) -> Self {
        let controller = Self::new(store, remote);
        controller.hydrate().await;
        controller
    }

    // -------------------------------------------------------------------------
    // Observation
    // -------------------------------------------------------------------------

    /// Receiver that sees every subsequent transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase()
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Restore the session from a persisted credential. Runs at most once per
    /// controller; later calls return the current user without a remote call.
    ///
    /// Any failure clears the credential and leaves the session anonymous
    /// without setting `error`.
    pub async fn hydrate(&self) -> Option<User> {
        if self.hydrated.swap(true, Ordering::SeqCst) {
            return self.state.borrow().user.clone();
        }
        if !self.store.has_token() {
            debug!("no stored credential; skipping hydration");
            return None;
        }

        let pending = self.begin();
        match self.remote.current_user().await {
            Ok(user) => {
                info!(user_id = user.id, "session restored");
                pending.finish(|session| session.user = Some(user.clone()));
                Some(user)
            }
            Err(e) => {
                debug!(error = %e, "stored credential rejected; clearing");
                self.store.clear_token();
                pending.finish(|session| session.user = None);
                None
            }
        }
    }

    /// Submit credentials. On success the returned token is persisted and
    /// the user becomes current.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after recording its message in
    /// `Session::error`. A response with an empty token is treated as
    /// [`AuthError::MissingToken`].
    pub async fn login(&self, credentials: &LoginRequest) -> Result<User, AuthError> {
        let pending = self.begin();
        match self.remote.login(credentials).await {
            Ok(response) => self.accept_token(pending, response),
            Err(e) => Err(Self::fail(pending, e)),
        }
    }

    /// Register a new account and make it the current user. No credential is
    /// stored since registration issues none.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after recording its message in
    /// `Session::error`.
    pub async fn signup(&self, user_data: &SignupRequest) -> Result<User, AuthError> {
        let pending = self.begin();
        match self.remote.signup(user_data).await {
            Ok(user) => {
                info!(user_id = user.id, "signed up");
                pending.finish(|session| session.user = Some(user.clone()));
                Ok(user)
            }
            Err(e) => Err(Self::fail(pending, e)),
        }
    }

    /// End the session. The credential is cleared and the session becomes
    /// anonymous whatever the remote call returns.
    pub async fn logout(&self) {
        let pending = self.begin();
        if let Err(e) = self.remote.logout().await {
            warn!(error = %e, "remote logout failed; clearing local session anyway");
        }
        self.store.clear_token();
        pending.finish(|session| {
            session.user = None;
            session.error = None;
        });
        info!("logged out");
    }

    /// Swap the current credential for a fresh one.
    ///
    /// A rejected credential (401/403) is cleared along with the user; other
    /// failures keep the session as it was and only record the error.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after recording its message in
    /// `Session::error`.
    pub async fn refresh(&self) -> Result<User, AuthError> {
        let pending = self.begin();
        match self.remote.refresh().await {
            Ok(response) => self.accept_token(pending, response),
            Err(e) if e.is_unauthorized() => {
                self.store.clear_token();
                Err(Self::fail(pending, e))
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed");
                let message = e.message();
                pending.finish(|session| session.error = Some(message));
                Err(e)
            }
        }
    }

    /// Dismiss the current error. Purely local.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|session| session.error.take().is_some());
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    fn begin(&self) -> Pending<'_> {
        self.state.send_modify(|session| {
            session.loading = true;
            session.error = None;
        });
        Pending { state: &self.state, done: false }
    }

    fn accept_token(&self, pending: Pending<'_>, response: AuthResponse) -> Result<User, AuthError> {
        if response.access_token.is_empty() {
            return Err(Self::fail(pending, AuthError::MissingToken));
        }
        self.store.set_token(&response.access_token);
        let user = response.user;
        info!(user_id = user.id, "authenticated");
        pending.finish(|session| session.user = Some(user.clone()));
        Ok(user)
    }

    fn fail(pending: Pending<'_>, error: AuthError) -> AuthError {
        warn!(error = %error, "authentication failed");
        let message = error.message();
        pending.finish(|session| {
            session.user = None;
            session.error = Some(message);
        });
        error
    }
}
