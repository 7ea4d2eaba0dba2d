// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

use axum::{
    body::Body,
    http::{header, Request, Response},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use vingo_auth::config::Config;
use vingo_auth::db::FirestoreDb;
use vingo_auth::routes::create_router;
use vingo_auth::services::MailService;
use vingo_auth::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Shared state with in-memory store and mock mailer.
#[allow(dead_code)]
pub fn test_state_with_config(config: Config) -> Arc<AppState> {
    Arc::new(AppState::new(
        config,
        FirestoreDb::new_in_memory(),
        MailService::new_mock(),
    ))
}

/// Create a test app with offline dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = test_state_with_config(config);
    (create_router(state.clone()), state)
}

/// POST a JSON body.
#[allow(dead_code)]
pub async fn post_json(app: &axum::Router, uri: &str, body: Value) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// GET with an optional `Cookie` header.
#[allow(dead_code)]
pub async fn get_with_cookie(app: &axum::Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// All `Set-Cookie` header values.
#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

/// The `name=value` pair of the session cookie, ready for a `Cookie` header.
#[allow(dead_code)]
pub fn session_cookie_pair(response: &Response<Body>) -> String {
    set_cookie_headers(response)
        .into_iter()
        .find(|value| value.starts_with("token="))
        .and_then(|value| value.split(';').next().map(str::to_string))
        .expect("missing session cookie")
}

/// Sign-up body for the canonical test user.
#[allow(dead_code)]
pub fn jane_signup() -> Value {
    serde_json::json!({
        "fullName": "Jane",
        "email": "jane@x.com",
        "password": "secret1",
        "mobile": "9998887777",
        "role": "user"
    })
}
