mod common;

use axum::http::StatusCode;
use common::TestApp;
use concord::Role;
use serde_json::json;

#[tokio::test]
async fn register_login_and_wrong_password() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/api/v1/users", None, json!({"email": "a@b.com", "password": "abc123"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "a@b.com");
    assert!(body["data"].get("password").is_none());
    assert!(!body.to_string().contains("abc123"));

    let (status, body) = app.login("a@b.com", "abc123").await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap();
    assert!(!token.is_empty());
    assert!(body["data"]["user"].get("password").is_none());

    let claims = app.state.tokens.verify(token).unwrap();
    assert_eq!(claims.role, Role::User);
    assert_eq!(claims.name, "a");

    let (status, body) = app.login("a@b.com", "wrong-pass").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = app.login("nobody@b.com", "abc123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_normalizes_email() {
    let app = TestApp::new();
    app.register("Mixed@Case.com").await;
    let (status, _) = app.login("  mixed@case.COM ", "abc123").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = TestApp::new();
    app.register("a@b.com").await;
    let (status, body) = app
        .post("/api/v1/users", None, json!({"email": "a@b.com", "password": "other1"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn invalid_registrations_are_bad_requests() {
    let app = TestApp::new();
    for body in [
        json!({"email": "not-an-email", "password": "abc123"}),
        json!({"email": "a@b.com", "password": "123"}),
        json!(["a@b.com"]),
    ] {
        let (status, resp) = app.post("/api/v1/users", None, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{resp}");
    }
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = TestApp::new();
    let (id, token) = app.register("a@b.com").await;

    let (status, body) = app.get("/api/v1/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.to_string());

    let (status, body) = app.get("/api/v1/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = app.get("/api/v1/auth/me", Some("not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn common_routes_and_fallback() {
    let app = TestApp::new();
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.get("/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage"], "ok");

    let (status, body) = app.get("/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "concord-api");

    let (status, body) = app.get("/api/v1/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_email_and_wrong_password_look_alike() {
    let app = TestApp::new();
    app.register("a@b.com").await;

    let (wrong_status, wrong) = app.login("a@b.com", "wrong-pass").await;
    let (missing_status, missing) = app.login("ghost@b.com", "wrong-pass").await;
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing_status, wrong_status);
    assert_eq!(missing, wrong);
}
