// ABOUTME: HTTP surface tests driving the router with scripted collaborators
// ABOUTME: Guard projections (503/401/403), happy paths, and token forwarding
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::{profile_with_role, sample_member, session_for, MockAuthProvider, MockDataProvider};
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use studio_admin::config::environment::{BackendConfig, CorsConfig, Environment, ServerConfig};
use studio_admin::models::StaffRole;
use studio_admin::providers::FunctionsClient;
use studio_admin::routes::{router, AppState};
use studio_admin::session::SessionStore;
use tower::ServiceExt;
use url::Url;
use uuid::Uuid;

fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        environment: Environment::Testing,
        backend: BackendConfig {
            base_url: Url::parse("http://localhost:54321/").unwrap(),
            publishable_key: "test-key".into(),
            timeout_secs: 5,
            connect_timeout_secs: 2,
        },
        cors: CorsConfig {
            allowed_origins: "*".into(),
        },
    }
}

/// Build an app over the mocks. When `initialize` is false the store stays in
/// its startup loading state.
async fn app(
    auth: Arc<MockAuthProvider>,
    data: Arc<MockDataProvider>,
    initialize: bool,
) -> Router {
    let config = test_config();
    let store = SessionStore::new(auth, data.clone());
    if initialize {
        store.initialize().await;
        let mut rx = store.subscribe();
        tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| !s.loading))
            .await
            .expect("store did not settle")
            .expect("snapshot channel closed");
    }
    let state = AppState {
        store,
        data,
        functions: Arc::new(FunctionsClient::new(&config.backend)),
    };
    router(state, &config)
}

/// App with a signed-in staff member of the given role
async fn app_signed_in(role: StaffRole, data: Arc<MockDataProvider>) -> (Router, String) {
    let user_id = Uuid::new_v4();
    let session = session_for(user_id);
    let token = session.access_token.clone();
    let auth = Arc::new(MockAuthProvider::with_session(session));
    data.insert_profile(profile_with_role(user_id, Some(role)));
    (app(auth, data, true).await, token)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

fn post_json(path: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn guarded_screen_is_unavailable_while_loading() {
    let auth = Arc::new(MockAuthProvider::new());
    let data = Arc::new(MockDataProvider::new());
    let app = app(auth, data, false).await;

    let response = app.oneshot(get("/api/members")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "RESOURCE_UNAVAILABLE");
}

#[tokio::test]
async fn guarded_screen_redirects_anonymous_to_login() {
    let auth = Arc::new(MockAuthProvider::new());
    let data = Arc::new(MockDataProvider::new());
    let app = app(auth, data, true).await;

    let response = app.oneshot(get("/api/members")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "AUTH_REQUIRED");
    assert_eq!(body["error"]["details"]["login"], "/login");
    assert_eq!(body["error"]["details"]["return_to"], "/members");
}

#[tokio::test]
async fn unresolved_role_is_redirected_not_denied() {
    let user_id = Uuid::new_v4();
    let auth = Arc::new(MockAuthProvider::with_session(session_for(user_id)));
    let data = Arc::new(MockDataProvider::new());
    // No profile record: authenticated but role never resolves.
    let app = app(auth, data, true).await;

    let response = app.oneshot(get("/api/members")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn coach_is_denied_on_payroll() {
    let data = Arc::new(MockDataProvider::new());
    let (app, _) = app_signed_in(StaffRole::Coach, data).await;

    let response = app
        .oneshot(get("/api/payroll?period_start=2026-08-01&period_end=2026-08-31"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn admin_lists_members_under_their_own_token() {
    let data = Arc::new(MockDataProvider::new());
    data.members.lock().unwrap().push(sample_member());
    let (app, token) = app_signed_in(StaffRole::Admin, data.clone()).await;

    let response = app.oneshot(get("/api/members")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["full_name"], "Jamie Rivera");

    // The query ran under the caller's token, not a service identity.
    assert_eq!(data.last_token.lock().unwrap().as_deref(), Some(token.as_str()));
}

#[tokio::test]
async fn coach_can_read_the_schedule() {
    let data = Arc::new(MockDataProvider::new());
    let (app, _) = app_signed_in(StaffRole::Coach, data).await;

    let response = app.oneshot(get("/api/schedule")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_cannot_provision_users() {
    let data = Arc::new(MockDataProvider::new());
    let (app, _) = app_signed_in(StaffRole::Admin, data).await;

    let response = app
        .oneshot(post_json(
            "/api/users",
            &serde_json::json!({
                "email": "new.coach@studio.example",
                "password": "initial-password",
                "role": "coach",
                "display_name": "New Coach"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn coach_cannot_decide_leave_requests() {
    let data = Arc::new(MockDataProvider::new());
    let (app, _) = app_signed_in(StaffRole::Coach, data).await;

    let response = app
        .oneshot(post_json(
            &format!("/api/leave/{}/status", Uuid::new_v4()),
            &serde_json::json!({ "status": "approved" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn nav_is_empty_for_anonymous() {
    let auth = Arc::new(MockAuthProvider::new());
    let data = Arc::new(MockDataProvider::new());
    let app = app(auth, data, true).await;

    let response = app.oneshot(get("/api/nav")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn nav_reflects_the_signed_in_role() {
    let data = Arc::new(MockDataProvider::new());
    let (app, _) = app_signed_in(StaffRole::Coach, data).await;

    let response = app.oneshot(get("/api/nav")).await.unwrap();
    let body = body_json(response).await;
    let paths: Vec<&str> = body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["/schedule", "/bookings", "/leave"]);
}

#[tokio::test]
async fn login_with_bad_credentials_is_unauthorized() {
    let auth = Arc::new(MockAuthProvider::new());
    let data = Arc::new(MockDataProvider::new());
    let app = app(auth, data, true).await;

    let response = app
        .oneshot(post_json(
            "/auth/login",
            &serde_json::json!({
                "email": "front.desk@studio.example",
                "password": "wrong"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "AUTH_INVALID");
}

#[tokio::test]
async fn session_endpoint_reports_startup_loading() {
    let auth = Arc::new(MockAuthProvider::new());
    let data = Arc::new(MockDataProvider::new());
    let app = app(auth, data, false).await;

    let response = app.oneshot(get("/auth/session")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["loading"], true);
    assert_eq!(body["authenticated"], false);
}

#[tokio::test]
async fn health_needs_no_session() {
    let auth = Arc::new(MockAuthProvider::new());
    let data = Arc::new(MockDataProvider::new());
    let app = app(auth, data, false).await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn bookings_filter_requires_exactly_one_scope() {
    let data = Arc::new(MockDataProvider::new());
    let (app, _) = app_signed_in(StaffRole::Coach, data).await;

    let response = app.oneshot(get("/api/bookings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
