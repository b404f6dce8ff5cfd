//! # touchline
//!
//! Client-side session lifecycle and API client for the Touchline football
//! coaching assistant.
//!
//! - [`store::SessionStore`] owns the persisted bearer token.
//! - [`session::SessionController`] drives login, signup, logout, refresh
//!   and startup hydration, publishing [`session::Session`] to observers.
//! - [`api::ApiClient`] is the HTTP implementation of
//!   [`remote::RemoteAuthService`] and also wraps the data endpoints.
//! - [`config::ClientConfig`] reads settings from the environment.

pub mod api;
pub mod config;
pub mod error;
pub mod remote;
pub mod session;
pub mod store;
pub mod types;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::AuthError;
pub use remote::RemoteAuthService;
pub use session::{Session, SessionController, SessionPhase};
pub use store::SessionStore;
pub use types::{AuthResponse, LoginRequest, SignupRequest, User};
