//! Shared harness: the full router over an in-memory store, driven with `oneshot`.
#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use concord::notify::LogNotifier;
use concord::{app, AppState, MemoryStore, Registry, Settings};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let env: HashMap<&str, &str> = [
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "integration-secret"),
            ("BCRYPT_COST", "4"),
        ]
        .into_iter()
        .collect();
        let settings = Settings::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        let store = Arc::new(MemoryStore::new(Registry::standard().unwrap()));
        let state = AppState::new(store, Arc::new(LogNotifier), settings);
        TestApp {
            router: app(state.clone()),
            state,
        }
    }

    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", t));
        }
        let req = match body {
            Some(b) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, token, None).await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post("/api/v1/auth/login", None, json!({"email": email, "password": password}))
            .await
    }

    /// Register through the public endpoint and log in; returns (id, token).
    pub async fn register(&self, email: &str) -> (Uuid, String) {
        let (status, body) = self
            .post("/api/v1/users", None, json!({"email": email, "password": "abc123"}))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        self.token_for(email).await
    }

    /// Seed a user with `role` directly through the controller, then log in.
    pub async fn seed(&self, email: &str, role: &str) -> (Uuid, String) {
        self.state
            .controller::<concord::model::entities::User>()
            .create(json!({"email": email, "password": "abc123", "role": role}))
            .await
            .unwrap();
        self.token_for(email).await
    }

    async fn token_for(&self, email: &str) -> (Uuid, String) {
        let (status, body) = self.login(email, "abc123").await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let id = Uuid::parse_str(body["data"]["user"]["id"].as_str().unwrap()).unwrap();
        (id, body["data"]["token"].as_str().unwrap().to_string())
    }
}
