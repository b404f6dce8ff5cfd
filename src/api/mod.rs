//! HTTP client for the coaching-assistant API.
//!
//! DESIGN
//! ======
//! One `reqwest::Client` per `ApiClient`, configured with request/connect
//! timeouts. The stored credential is read from the shared [`SessionStore`]
//! on every call and attached as `Authorization: Bearer <token>`; the client
//! never writes the store.
//!
//! ERROR HANDLING
//! ==============
//! Every failure becomes an [`AuthError`]:
//! - no response at all -> `Transport`
//! - non-2xx -> `Api`, message taken from the body's `detail` string when
//!   present, else `"HTTP error! status: <code>"` (login uses
//!   `"Login failed"` as its fallback instead)
//! - 2xx with an undecodable body -> `Parse`

pub mod data;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, HttpTimeouts};
use crate::error::{AuthError, http_error_message};
use crate::remote::RemoteAuthService;
use crate::store::SessionStore;
use crate::types::{ApiErrorBody, AuthResponse, LoginRequest, SignupRequest, User};

const LOGIN_FAILED: &str = "Login failed";

/// HTTP implementation of [`RemoteAuthService`] plus the data endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: SessionStore,
}

impl ApiClient {
    /// Build a client rooted at `base_url` (e.g. `http://localhost:8000/api/v1`).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(base_url: &str, store: SessionStore, timeouts: HttpTimeouts) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| AuthError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned(), store })
    }

    /// Build a client from a parsed [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig, store: SessionStore) -> Result<Self, AuthError> {
        Self::new(&config.api_url, store, config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The credential store this client reads bearer tokens from.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.store.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a JSON request (bearer attached when stored) and decode the reply.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] per the module's error-handling rules.
    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, AuthError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::debug!(%method, path, "api request");
        let builder = self.authorized(self.http.request(method.clone(), self.url(path)));
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        let result = read_response(builder.send().await, None).await;
        if let Err(e) = &result {
            tracing::debug!(%method, path, error = %e, "api request failed");
        }
        result
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AuthError> {
        self.request::<T, serde_json::Value>(Method::GET, path, None)
            .await
    }

    async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, AuthError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, body).await
    }
}

#[async_trait::async_trait]
impl RemoteAuthService for ApiClient {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, AuthError> {
        // The token endpoint takes an OAuth2 password form, not JSON, and
        // never sees a bearer header.
        tracing::debug!(username = %credentials.username, "api login");
        let response = self
            .http
            .post(self.url("/auth/login"))
            .form(credentials)
            .send()
            .await;
        read_response(response, Some(LOGIN_FAILED)).await
    }

    async fn signup(&self, user: &SignupRequest) -> Result<User, AuthError> {
        self.post("/auth/register", Some(user)).await
    }

    async fn current_user(&self) -> Result<User, AuthError> {
        self.get("/auth/me").await
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.post::<serde_json::Value, serde_json::Value>("/auth/logout", None)
            .await
            .map(|_| ())
    }

    async fn refresh(&self) -> Result<AuthResponse, AuthError> {
        self.post::<AuthResponse, serde_json::Value>("/auth/refresh", None)
            .await
    }
}

async fn read_response<T: DeserializeOwned>(
    response: Result<reqwest::Response, reqwest::Error>,
    fallback: Option<&str>,
) -> Result<T, AuthError> {
    let response = response.map_err(|e| AuthError::Transport(e.to_string()))?;
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| AuthError::Transport(e.to_string()))?;
    if !(200..300).contains(&status) {
        return Err(error_from_body(status, &text, fallback));
    }
    decode_body(&text)
}

/// Normalize a failed response into [`AuthError::Api`].
pub(crate) fn error_from_body(status: u16, body: &str, fallback: Option<&str>) -> AuthError {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message().map(str::to_owned));
    let message = detail.unwrap_or_else(|| fallback.map_or_else(|| http_error_message(status), str::to_owned));
    AuthError::Api { status, message }
}

/// Decode a success body. An empty body reads as JSON `null`.
pub(crate) fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, AuthError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    Ok(serde_json::from_str(text)?)
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub(crate) mod test_helpers {
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode, header};
    use axum::response::{IntoResponse, Json, Response};
    use axum::routing::{get, post};
    use serde_json::{Value, json};
    use std::collections::HashMap;

    use crate::types::User;

    pub const GOOD_TOKEN: &str = "abc123";
    pub const REFRESHED_TOKEN: &str = "def456";

    /// User fixture with the given id.
    #[must_use]
    pub fn sample_user(id: i64) -> User {
        serde_json::from_value(user_json(id)).expect("fixture user should decode")
    }

    fn user_json(id: i64) -> Value {
        json!({
            "id": id,
            "email": "coach@example.com",
            "username": "coach",
            "full_name": null,
            "role": "coach",
            "team_id": null,
            "is_active": true,
            "is_verified": true,
            "created_at": "2025-01-01T00:00:00Z"
        })
    }

    fn detail(status: StatusCode, message: &str) -> Response {
        (status, Json(json!({ "detail": message }))).into_response()
    }

    fn bearer_ok(headers: &HeaderMap, token: &str) -> bool {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {token}"))
    }

    async fn login(axum::Form(form): axum::Form<HashMap<String, String>>) -> Response {
        match form.get("password").map(String::as_str) {
            Some("right") => Json(json!({
                "access_token": GOOD_TOKEN,
                "token_type": "bearer",
                "user": user_json(1)
            }))
            .into_response(),
            Some("crash") => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
            Some("empty-token") => Json(json!({ "access_token": "", "user": user_json(1) })).into_response(),
            _ => detail(StatusCode::UNAUTHORIZED, "Invalid credentials"),
        }
    }

    async fn register(Json(body): Json<Value>) -> Response {
        if body.get("email").and_then(Value::as_str) == Some("taken@example.com") {
            return detail(StatusCode::BAD_REQUEST, "Email already registered");
        }
        Json(user_json(2)).into_response()
    }

    async fn me(headers: HeaderMap) -> Response {
        if bearer_ok(&headers, GOOD_TOKEN) || bearer_ok(&headers, REFRESHED_TOKEN) {
            Json(user_json(1)).into_response()
        } else {
            detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
        }
    }

    async fn logout() -> Json<Value> {
        Json(json!({ "message": "Successfully logged out" }))
    }

    async fn refresh(headers: HeaderMap) -> Response {
        if bearer_ok(&headers, GOOD_TOKEN) {
            Json(json!({ "access_token": REFRESHED_TOKEN, "token_type": "bearer", "user": user_json(1) }))
                .into_response()
        } else {
            detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
        }
    }

    async fn echo_auth(headers: HeaderMap) -> Json<Value> {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        Json(json!({ "authorization": auth }))
    }

    async fn echo_body(Json(body): Json<Value>) -> Json<Value> {
        Json(json!({ "received": body }))
    }

    /// Routes mirroring the coaching API under `/api/v1`, plus a few that
    /// misbehave on purpose.
    fn router() -> Router {
        let api = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/auth/me", get(me))
            .route("/auth/logout", post(logout))
            .route("/auth/refresh", post(refresh))
            .route("/matches", get(echo_auth).post(echo_body))
            .route("/matches/{id}", get(|| async { Json(json!({ "id": 42, "home": "Touchline FC" })) }))
            .route("/teams", get(echo_auth).post(echo_body))
            .route("/players", get(echo_auth).post(echo_body))
            .route("/analysis/match/{id}", get(|| async { Json(json!({ "possession": 61 })) }))
            .route("/analysis/team/{id}/performance", get(|| async { Json(json!({ "form": "WWDLW" })) }))
            .route("/analysis/player/{id}/stats", get(|| async { Json(json!({ "goals": 9 })) }))
            .route("/ai/recommendations", post(echo_body))
            .route("/ai/match-prediction", post(echo_body))
            .route("/ai/opponent-analysis", post(echo_body))
            .route("/ai/training-suggestions", post(echo_body))
            .route("/broken", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }))
            .route("/garbled", get(|| async { "this is not json" }))
            .route("/empty", post(|| async { StatusCode::NO_CONTENT }));
        Router::new().nest("/api/v1", api)
    }

    /// Serve the fake API on an ephemeral port and return its `/api/v1` root.
    pub async fn spawn_fake_api() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind should succeed");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router())
                .await
                .expect("fake api should serve");
        });
        format!("http://{addr}/api/v1")
    }

    /// A base URL nothing is listening on.
    pub async fn dead_api_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind should succeed");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        format!("http://{addr}/api/v1")
    }
}
