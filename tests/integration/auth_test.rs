//! Integration tests for registration, login, and token handling.

use chrono::Duration;
use http::StatusCode;
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

fn login_body(email: &str, password: &str) -> serde_json::Value {
    json!({ "email": email, "password": password })
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["storage"], "memory");
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new();
    let (_, user_id) = app.register("ada").await;

    let response = app
        .request("POST", "/auth/login", Some(login_body("ada@example.com", PASSWORD)), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user"]["id"], user_id.to_string());
    assert!(response.body["data"]["token"].is_string());
    assert!(response.body["data"]["expires_at"].is_string());
    assert!(response.body["data"]["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_conflicts() {
    let app = TestApp::new();
    app.register("ada").await;

    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({
                "email": "ada@example.com",
                "username": "brand-new",
                "password": PASSWORD,
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "EMAIL_EXISTS");

    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({
                "email": "someone@example.com",
                "username": "ada",
                "password": PASSWORD,
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "USERNAME_EXISTS");
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({ "email": "not-an-email", "username": "ada", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_INPUT");

    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({ "email": "ada@example.com", "username": "ada", "password": "123" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_INPUT");

    let response = app
        .request("POST", "/auth/register", Some(json!({ "email": 42 })), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures_share_one_error() {
    let app = TestApp::new();
    app.register("ada").await;

    let unknown = app
        .request("POST", "/auth/login", Some(login_body("nobody@example.com", PASSWORD)), None)
        .await;
    let wrong = app
        .request("POST", "/auth/login", Some(login_body("ada@example.com", "wrong-pass")), None)
        .await;

    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.error_code(), "INVALID_CREDENTIALS");
    assert_eq!(unknown.body, wrong.body);
}

#[tokio::test]
async fn test_bearer_parsing() {
    let app = TestApp::new();
    let (token, _) = app.register("ada").await;

    let missing = app.request("GET", "/api/profile", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.error_code(), "UNAUTHORIZED");

    for header in ["Basic abc", "Bearer ", "Token abc", "Bearer not.a.jwt"] {
        let response = app.request_with_header("/api/profile", header).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{header}");
    }

    let ok = app
        .request_with_header("/api/profile", &format!("Bearer {token}"))
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["data"]["username"], "ada");
}

#[tokio::test]
async fn test_token_expires() {
    let app = TestApp::new();
    let (token, _) = app.register("ada").await;

    app.clock.advance(Duration::hours(23));
    let response = app.request("GET", "/api/profile", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    app.clock.advance(Duration::hours(1));
    let response = app.request("GET", "/api/profile", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let app = TestApp::new();
    let (token, _) = app.register("ada").await;

    let mut bytes = token.into_bytes();
    let i = bytes.len() - 2;
    bytes[i] = if bytes[i] == b'x' { b'y' } else { b'x' };
    let tampered = String::from_utf8(bytes).unwrap();

    let response = app.request("GET", "/api/profile", None, Some(&tampered)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_update_and_password_change() {
    let app = TestApp::new();
    let (token, _) = app.register("ada").await;

    let response = app
        .request(
            "PUT",
            "/api/profile",
            Some(json!({ "first_name": "Augusta" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["first_name"], "Augusta");
    assert_eq!(response.body["data"]["last_name"], "Tester");

    let wrong = app
        .request(
            "PUT",
            "/api/password",
            Some(json!({ "old_password": "wrong-pass", "new_password": "brand-new-pass" })),
            Some(&token),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.error_code(), "INVALID_CREDENTIALS");

    let changed = app
        .request(
            "PUT",
            "/api/password",
            Some(json!({ "old_password": PASSWORD, "new_password": "brand-new-pass" })),
            Some(&token),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);

    let old = app
        .request("POST", "/auth/login", Some(login_body("ada@example.com", PASSWORD)), None)
        .await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);

    let new = app
        .request("POST", "/auth/login", Some(login_body("ada@example.com", "brand-new-pass")), None)
        .await;
    assert_eq!(new.status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_token() {
    let app = TestApp::new();
    let (token, user_id) = app.register("ada").await;

    let response = app.request("POST", "/api/token", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user"]["id"], user_id.to_string());
}

#[tokio::test]
async fn test_deactivation_blocks_login_but_not_live_tokens() {
    let app = TestApp::new();
    let (token, _) = app.register("ada").await;

    let response = app
        .request("POST", "/api/account/deactivate", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let login = app
        .request("POST", "/auth/login", Some(login_body("ada@example.com", PASSWORD)), None)
        .await;
    assert_eq!(login.status, StatusCode::FORBIDDEN);

    let wrong = app
        .request("POST", "/auth/login", Some(login_body("ada@example.com", "wrong-pass")), None)
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let refresh = app.request("POST", "/api/token", None, Some(&token)).await;
    assert_eq!(refresh.status, StatusCode::FORBIDDEN);

    // Stateless tokens stay usable until they expire.
    let profile = app.request("GET", "/api/profile", None, Some(&token)).await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["data"]["is_active"], false);
}
