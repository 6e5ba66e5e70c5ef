mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn protected_routes_need_a_token() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/v1/users", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = app.get("/api/v1/channels", Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_gate_admits_role_or_admin() {
    let app = TestApp::new();
    let (user_id, user) = app.register("u@b.com").await;
    let (_, admin) = app.seed("root@b.com", "admin").await;
    let (_, moderator) = app.seed("mod@b.com", "moderator").await;

    let (status, server) = app
        .post("/api/v1/servers", Some(&user), json!({"name": "rustaceans"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let server_id = server["data"]["id"].as_str().unwrap().to_string();

    let role = json!({"server_id": server_id, "name": "ops", "permissions": 8});
    let (status, _) = app.post("/api/v1/roles", Some(&user), role.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.post("/api/v1/roles", Some(&admin), role).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["permissions"], 8);

    let ban = json!({"server_id": server_id, "user_id": user_id, "reason": "spam"});
    let (status, _) = app.post("/api/v1/bans", Some(&user), ban.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.post("/api/v1/bans", Some(&moderator), ban).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = app.get("/api/v1/bans", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 1);
}

#[tokio::test]
async fn users_edit_only_themselves() {
    let app = TestApp::new();
    let (alice_id, alice) = app.register("alice@b.com").await;
    let (_, bob) = app.register("bob@b.com").await;
    let (_, admin) = app.seed("root@b.com", "admin").await;
    let uri = format!("/api/v1/users/{}", alice_id);

    let (status, _) = app.put(&uri, Some(&bob), json!({"display_name": "mallory"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&uri, Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.put(&uri, Some(&alice), json!({"display_name": "Alice"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["display_name"], "Alice");

    let (status, body) = app.put(&uri, Some(&admin), json!({"avatar_url": "https://x/a.png"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["display_name"], "Alice");

    let (status, _) = app.get(&uri, Some(&bob)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn role_cannot_be_self_assigned() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/v1/users",
            None,
            json!({"email": "sneaky@b.com", "password": "abc123", "role": "admin"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "user");

    let (id, token) = app.register("climber@b.com").await;
    let uri = format!("/api/v1/users/{}", id);
    let (status, body) = app
        .put(&uri, Some(&token), json!({"role": "admin", "display_name": "climber"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "user");
    assert_eq!(body["data"]["display_name"], "climber");

    let (_, body) = app.get(&uri, Some(&token)).await;
    assert_eq!(body["data"]["role"], "user");
}

#[tokio::test]
async fn owner_column_is_stamped_and_immutable() {
    let app = TestApp::new();
    let (alice_id, alice) = app.register("alice@b.com").await;
    let (bob_id, bob) = app.register("bob@b.com").await;

    let (status, body) = app
        .post("/api/v1/servers", Some(&alice), json!({"name": "s", "owner_id": bob_id}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["owner_id"], alice_id.to_string());
    let uri = format!("/api/v1/servers/{}", body["data"]["id"].as_str().unwrap());

    let (status, _) = app.put(&uri, Some(&bob), json!({"name": "taken"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.put(&uri, Some(&alice), json!({"owner_id": bob_id, "name": "t"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["owner_id"], alice_id.to_string());
    assert_eq!(body["data"]["name"], "t");
}

#[tokio::test]
async fn ownership_on_missing_rows_is_not_found() {
    let app = TestApp::new();
    let (_, token) = app.register("a@b.com").await;
    let uri = format!("/api/v1/messages/{}", Uuid::new_v4());
    let (status, _) = app.delete(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.put("/api/v1/messages/not-a-uuid", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn both_sides_of_a_friendship_may_update_it() {
    let app = TestApp::new();
    let (_, alice) = app.register("alice@b.com").await;
    let (bob_id, bob) = app.register("bob@b.com").await;
    let (_, carol) = app.register("carol@b.com").await;

    let (status, body) = app
        .post("/api/v1/friends", Some(&alice), json!({"addressee_id": bob_id}))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["status"], "pending");
    let uri = format!("/api/v1/friends/{}", body["data"]["id"].as_str().unwrap());

    let (status, _) = app.put(&uri, Some(&carol), json!({"status": "accepted"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.put(&uri, Some(&bob), json!({"status": "accepted"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "accepted");
    let (status, _) = app.delete(&uri, Some(&alice)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn self_friend_requests_are_rejected() {
    let app = TestApp::new();
    let (me, token) = app.register("a@b.com").await;
    let (status, _) = app
        .post("/api/v1/friends", Some(&token), json!({"addressee_id": me}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn moderators_use_everyday_routes() {
    let app = TestApp::new();
    let (mod_id, moderator) = app.seed("mod@b.com", "moderator").await;

    let (status, _) = app.get("/api/v1/channels", Some(&moderator)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post("/api/v1/servers", Some(&moderator), json!({"name": "mods"}))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["owner_id"], mod_id.to_string());
    let server_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/api/v1/channels",
            Some(&moderator),
            json!({"server_id": server_id, "name": "general"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let channel_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/api/v1/messages",
            Some(&moderator),
            json!({"channel_id": channel_id, "content": "hello"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["author_id"], mod_id.to_string());

    let (status, _) = app.get("/api/v1/roles", Some(&moderator)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .post(
            "/api/v1/roles",
            Some(&moderator),
            json!({"server_id": server_id, "name": "ops"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bans_record_the_issuing_moderator() {
    let app = TestApp::new();
    let (user_id, user) = app.register("u@b.com").await;
    let (mod_id, moderator) = app.seed("mod@b.com", "moderator").await;

    let (_, server) = app
        .post("/api/v1/servers", Some(&user), json!({"name": "s"}))
        .await;
    let server_id = server["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/api/v1/bans",
            Some(&moderator),
            json!({"server_id": server_id, "user_id": user_id, "banned_by": user_id}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["banned_by"], mod_id.to_string());
    let uri = format!("/api/v1/bans/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = app
        .put(&uri, Some(&moderator), json!({"banned_by": user_id, "reason": "spam"}))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["banned_by"], mod_id.to_string());
    assert_eq!(body["data"]["reason"], "spam");
}

#[tokio::test]
async fn sensitive_fields_are_ignored_as_list_filters() {
    let app = TestApp::new();
    let (_, token) = app.register("a@b.com").await;
    app.register("b@b.com").await;

    let (status, body) = app.get("/api/v1/users?password=nope", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 2);

    let (_, body) = app.get("/api/v1/users?email=b@b.com", Some(&token)).await;
    assert_eq!(body["meta"]["count"], 1);
}
