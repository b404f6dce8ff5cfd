use super::test_helpers::{GOOD_TOKEN, REFRESHED_TOKEN, dead_api_url, spawn_fake_api};
use super::*;

fn client(base_url: &str, store: SessionStore) -> ApiClient {
    ApiClient::new(base_url, store, HttpTimeouts::default()).unwrap()
}

// =============================================================
// error_from_body / decode_body
// =============================================================

#[test]
fn error_body_detail_becomes_message() {
    let err = error_from_body(401, r#"{"detail":"Invalid credentials"}"#, None);
    assert_eq!(err, AuthError::Api { status: 401, message: "Invalid credentials".into() });
}

#[test]
fn error_without_detail_uses_status_message() {
    let err = error_from_body(503, "<html>bad gateway</html>", None);
    assert_eq!(err.message(), "HTTP error! status: 503");
    assert_eq!(err.status(), Some(503));
}

#[test]
fn error_with_list_detail_uses_fallback() {
    let err = error_from_body(422, r#"{"detail":[{"msg":"field required"}]}"#, Some("Login failed"));
    assert_eq!(err.message(), "Login failed");
}

#[test]
fn decode_empty_body_as_null() {
    let value: serde_json::Value = decode_body("  ").unwrap();
    assert!(value.is_null());
}

#[test]
fn decode_garbage_is_parse_error() {
    let err = decode_body::<User>("nope").unwrap_err();
    assert!(matches!(err, AuthError::Parse(_)));
}

#[test]
fn new_trims_trailing_slash() {
    let api = client("http://localhost:8000/api/v1/", SessionStore::noop());
    assert_eq!(api.base_url(), "http://localhost:8000/api/v1");
}

// =============================================================
// Auth endpoints against the fake API
// =============================================================

#[tokio::test]
async fn login_posts_form_and_returns_token() {
    let base = spawn_fake_api().await;
    let store = SessionStore::memory();
    let api = client(&base, store.clone());

    let resp = api
        .login(&LoginRequest::new("coach@example.com", "right"))
        .await
        .unwrap();
    assert_eq!(resp.access_token, GOOD_TOKEN);
    assert_eq!(resp.user.id, 1);
    // Persisting is the controller's job, not the client's.
    assert_eq!(store.token(), None);
}

#[tokio::test]
async fn login_rejection_carries_server_detail() {
    let base = spawn_fake_api().await;
    let api = client(&base, SessionStore::noop());

    let err = api
        .login(&LoginRequest::new("coach@example.com", "wrong"))
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::Api { status: 401, message: "Invalid credentials".into() });
}

#[tokio::test]
async fn login_failure_without_detail_says_login_failed() {
    let base = spawn_fake_api().await;
    let api = client(&base, SessionStore::noop());

    let err = api
        .login(&LoginRequest::new("coach@example.com", "crash"))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Login failed");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn current_user_sends_bearer_token() {
    let base = spawn_fake_api().await;
    let store = SessionStore::memory();
    store.set_token(GOOD_TOKEN);
    let api = client(&base, store);

    let user = api.current_user().await.unwrap();
    assert_eq!(user.id, 1);
}

#[tokio::test]
async fn current_user_without_token_is_unauthorized() {
    let base = spawn_fake_api().await;
    let api = client(&base, SessionStore::memory());

    let err = api.current_user().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Could not validate credentials");
}

#[tokio::test]
async fn signup_posts_json_and_returns_user() {
    let base = spawn_fake_api().await;
    let api = client(&base, SessionStore::noop());
    let req = SignupRequest {
        email: "new@example.com".into(),
        username: "newcoach".into(),
        password: "pw".into(),
        full_name: None,
        role: None,
        team_id: None,
    };

    let user = api.signup(&req).await.unwrap();
    assert_eq!(user.id, 2);
}

#[tokio::test]
async fn signup_duplicate_email_is_rejected() {
    let base = spawn_fake_api().await;
    let api = client(&base, SessionStore::noop());
    let req = SignupRequest {
        email: "taken@example.com".into(),
        username: "dupe".into(),
        password: "pw".into(),
        full_name: None,
        role: None,
        team_id: None,
    };

    let err = api.signup(&req).await.unwrap_err();
    assert_eq!(err.message(), "Email already registered");
}

#[tokio::test]
async fn logout_accepts_message_body() {
    let base = spawn_fake_api().await;
    let api = client(&base, SessionStore::noop());
    api.logout().await.unwrap();
}

#[tokio::test]
async fn refresh_returns_new_token() {
    let base = spawn_fake_api().await;
    let store = SessionStore::memory();
    store.set_token(GOOD_TOKEN);
    let api = client(&base, store);

    let resp = api.refresh().await.unwrap();
    assert_eq!(resp.access_token, REFRESHED_TOKEN);
}

// =============================================================
// Generic failure normalization
// =============================================================

#[tokio::test]
async fn non_json_error_body_uses_status_message() {
    let base = spawn_fake_api().await;
    let api = client(&base, SessionStore::noop());

    let err = api
        .request::<serde_json::Value, serde_json::Value>(Method::GET, "/broken", None)
        .await
        .unwrap_err();
    assert_eq!(err.message(), "HTTP error! status: 500");
}

#[tokio::test]
async fn unparsable_success_body_is_parse_error() {
    let base = spawn_fake_api().await;
    let api = client(&base, SessionStore::noop());

    let err = api
        .request::<serde_json::Value, serde_json::Value>(Method::GET, "/garbled", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Parse(_)));
}

#[tokio::test]
async fn empty_success_body_decodes_as_null() {
    let base = spawn_fake_api().await;
    let api = client(&base, SessionStore::noop());

    let value = api
        .request::<serde_json::Value, serde_json::Value>(Method::POST, "/empty", None)
        .await
        .unwrap();
    assert!(value.is_null());
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let base = dead_api_url().await;
    let api = client(&base, SessionStore::noop());

    let err = api.current_user().await.unwrap_err();
    assert!(matches!(err, AuthError::Transport(_)));
    assert_eq!(err.status(), None);
}
