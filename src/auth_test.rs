use super::*;
use crate::state::test_helpers::*;

fn manager_for(base_url: &str) -> AuthManager {
    AuthManager::new(store_for(base_url))
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_201_reports_logged_in() {
    let stub = spawn_stub(201, serde_json::json!({ "detail": "ok" })).await;
    let auth = manager_for(&stub.base_url);

    let result = auth.login("alice", "pw").await;
    assert_eq!(result, AuthResult::Success(None));
    assert_eq!(auth.message(), "Logged in");
    assert_eq!(auth.code(), "201");
}

#[tokio::test]
async fn login_sends_credentials_to_signin() {
    let stub = spawn_stub(201, serde_json::json!({})).await;
    let auth = manager_for(&stub.base_url);

    auth.login("alice", "pw").await;
    let seen = stub.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "/users/signin");
    assert_eq!(
        seen[0].body,
        Some(serde_json::json!({ "username": "alice", "password": "pw" }))
    );
}

#[tokio::test]
async fn login_400_reports_failure() {
    let stub = spawn_stub(400, serde_json::json!({ "error": "bad credentials" })).await;
    let auth = manager_for(&stub.base_url);

    let result = auth.login("alice", "pw").await;
    assert!(matches!(result, AuthResult::HttpError { status: 400, ref body } if body.contains("bad credentials")));
    assert_eq!(auth.message(), "Failed to login");
    assert_eq!(auth.code(), "400");
}

#[tokio::test]
async fn login_200_is_not_success() {
    let stub = spawn_stub(200, serde_json::json!({})).await;
    let auth = manager_for(&stub.base_url);

    let result = auth.login("alice", "pw").await;
    assert!(!result.is_success());
    assert_eq!(auth.message(), MSG_LOGIN_FAILED);
}

#[tokio::test]
async fn login_unreachable_reports_external_error() {
    let auth = manager_for(&unreachable_base_url().await);

    let result = auth.login("alice", "pw").await;
    assert!(matches!(result, AuthResult::TransportError(_)));
    let message = auth.message();
    assert!(message.starts_with("External Error "), "got {message:?}");
    assert!(message.len() > EXTERNAL_ERROR_PREFIX.len());
}

#[tokio::test]
async fn login_201_with_unreadable_body_is_still_success() {
    let auth = manager_for(&spawn_truncated_body_server("201 Created").await);

    let result = auth.login("alice", "pw").await;
    assert_eq!(result, AuthResult::Success(None));
    assert_eq!(auth.message(), MSG_LOGGED_IN);
}

#[tokio::test]
async fn login_success_leaves_session_untouched_by_default() {
    let stub = spawn_stub(201, serde_json::to_value(dummy_user("srv-token")).unwrap()).await;
    let auth = manager_for(&stub.base_url);

    let result = auth.login("alice", "pw").await;
    assert_eq!(result, AuthResult::Success(Some(dummy_user("srv-token"))));
    assert!(!auth.store().is_logged_in());
    assert!(auth.store().token().is_none());
}

#[tokio::test]
async fn login_applies_user_when_enabled() {
    let stub = spawn_stub(201, serde_json::to_value(dummy_user("srv-token")).unwrap()).await;
    let auth = manager_for(&stub.base_url).with_apply_login_user(true);

    auth.login("alice", "pw").await;
    assert!(auth.store().is_logged_in());
    assert_eq!(auth.store().token().as_deref(), Some("srv-token"));

    auth.store().http_client().get("profile").await.unwrap();
    let seen = stub.seen();
    assert_eq!(seen[0].authorization, None);
    assert_eq!(seen[1].authorization.as_deref(), Some("Token srv-token"));
}

#[tokio::test]
async fn apply_enabled_ignores_non_user_body() {
    let stub = spawn_stub(201, serde_json::json!({ "detail": "ok" })).await;
    let config = ClientConfig { apply_login_user: true, ..config_for(&stub.base_url) };
    let auth = AuthManager::from_config(SessionStore::new(&config).unwrap(), &config);

    let result = auth.login("alice", "pw").await;
    assert!(result.is_success());
    assert!(!auth.store().is_logged_in());
}

#[tokio::test]
async fn login_failure_does_not_clear_existing_session() {
    let stub = spawn_stub(400, serde_json::json!({})).await;
    let auth = manager_for(&stub.base_url).with_apply_login_user(true);
    auth.store().set_user(dummy_user("keep"));

    auth.login("alice", "wrong").await;
    assert!(auth.store().is_logged_in());
    assert_eq!(auth.store().token().as_deref(), Some("keep"));
}

#[tokio::test]
async fn status_subscriber_sees_login_outcome() {
    let stub = spawn_stub(201, serde_json::json!({})).await;
    let auth = manager_for(&stub.base_url);
    let mut rx = auth.subscribe();

    auth.login("alice", "pw").await;
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().message, MSG_LOGGED_IN);
}

#[tokio::test]
async fn latest_call_owns_message() {
    let ok = spawn_stub(201, serde_json::json!({})).await;
    let auth = manager_for(&ok.base_url);

    auth.login("alice", "pw").await;
    auth.store().set_http_client(
        crate::http::HttpClient::new(&config_for(&unreachable_base_url().await)).unwrap(),
    );
    auth.login("alice", "pw").await;
    assert!(auth.message().starts_with(EXTERNAL_ERROR_PREFIX));
}

// =============================================================================
// register
// =============================================================================

#[test]
fn register_placeholder_reports_otp_prompt() {
    let auth = manager_for("http://127.0.0.1:9/");
    let status = auth.register();
    assert_eq!(status.code, "200");
    assert_eq!(status.message, "Verify OTP Register");
    assert_eq!(auth.status(), status);
}

#[test]
fn register_placeholder_overwrites_login_status() {
    let auth = manager_for("http://127.0.0.1:9/");
    auth.status.send_replace(AuthResult::HttpError { status: 500, body: String::new() }.status());
    auth.register();
    assert_eq!(auth.code(), REGISTER_CODE);
    assert_eq!(auth.message(), MSG_VERIFY_OTP);
}

// =============================================================================
// AuthResult::status
// =============================================================================

#[test]
fn transport_status_embeds_detail() {
    let status = AuthResult::TransportError("connection refused".into()).status();
    assert_eq!(status.message, "External Error connection refused");
    assert!(status.code.is_empty());
}
