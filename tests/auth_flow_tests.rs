// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! Sign-up and sign-in over HTTP.

use axum::http::{header, StatusCode};
use serde_json::json;

mod common;
use common::{body_json, jane_signup, post_json, session_cookie_pair};

#[tokio::test]
async fn test_signup_then_signin() {
    let (app, _) = common::create_test_app();

    let response = post_json(&app, "/api/auth/signup", jane_signup()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["user"]["fullName"], "Jane");
    assert_eq!(created["user"]["email"], "jane@x.com");
    assert_eq!(created["user"]["mobile"], "9998887777");
    assert_eq!(created["user"]["role"], "user");
    assert!(created["user"].get("passwordHash").is_none());

    let response = post_json(
        &app,
        "/api/auth/signin",
        json!({"email": "jane@x.com", "password": "secret1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let signed_in = body_json(response).await;
    assert_eq!(signed_in["user"]["id"], created["user"]["id"]);
}

#[tokio::test]
async fn test_signin_wrong_password() {
    let (app, _) = common::create_test_app();
    post_json(&app, "/api/auth/signup", jane_signup()).await;

    let response = post_json(
        &app,
        "/api/auth/signin",
        json!({"email": "jane@x.com", "password": "wrong"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_credential");
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_signin_unknown_email() {
    let (app, _) = common::create_test_app();

    let response = post_json(
        &app,
        "/api/auth/signin",
        json!({"email": "nobody@x.com", "password": "secret1"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "not_found");
}

#[tokio::test]
async fn test_duplicate_signup_conflicts_without_new_record() {
    let (app, state) = common::create_test_app();
    post_json(&app, "/api/auth/signup", jane_signup()).await;

    // Same email, different everything else
    let response = post_json(
        &app,
        "/api/auth/signup",
        json!({
            "fullName": "Other Jane",
            "email": "jane@x.com",
            "password": "another1",
            "mobile": "1112223333",
            "role": "owner"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["message"], "User already exists");

    let stored = state.db.find_user_by_email("jane@x.com").await.unwrap().unwrap();
    assert_eq!(stored.full_name, "Jane");
}

#[tokio::test]
async fn test_duplicate_checked_before_field_validation() {
    let (app, _) = common::create_test_app();
    post_json(&app, "/api/auth/signup", jane_signup()).await;

    let mut body = jane_signup();
    body["password"] = json!("short");
    let response = post_json(&app, "/api/auth/signup", body).await;

    assert_eq!(body_json(response).await["error"], "conflict");
}

#[tokio::test]
async fn test_signup_short_password() {
    let (app, state) = common::create_test_app();
    let mut body = jane_signup();
    body["password"] = json!("12345");

    let response = post_json(&app, "/api/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_input");
    assert_eq!(body["message"], "Password must be at least 6 characters long");
    assert!(state.db.find_user_by_email("jane@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_signup_empty_email_rejected() {
    let (app, state) = common::create_test_app();
    let mut body = jane_signup();
    body["email"] = json!("");

    let response = post_json(&app, "/api/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_input");
    assert_eq!(body["message"], "Email is required");
    assert!(state.db.find_user_by_email("").await.unwrap().is_none());
}

#[tokio::test]
async fn test_malformed_emails_rejected_everywhere() {
    let (app, _) = common::create_test_app();

    for email in ["   ", ".", "..", "__x__"] {
        let mut signup = jane_signup();
        signup["email"] = json!(email);
        let attempts = [
            ("/api/auth/signup", signup),
            ("/api/auth/signin", json!({"email": email, "password": "secret1"})),
            ("/api/auth/google-auth", json!({"email": email})),
            ("/api/auth/forgot-password", json!({"email": email})),
            ("/api/auth/verify-otp", json!({"email": email, "otp": "123456"})),
            (
                "/api/auth/reset-password",
                json!({"email": email, "newPassword": "newpass1"}),
            ),
        ];

        for (uri, body) in attempts {
            let response = post_json(&app, uri, body).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri} {email:?}");
            assert_eq!(body_json(response).await["error"], "invalid_input", "{uri} {email:?}");
        }
    }
}

#[tokio::test]
async fn test_signup_short_mobile() {
    let (app, _) = common::create_test_app();
    let mut body = jane_signup();
    body["mobile"] = json!("999888777");

    let response = post_json(&app, "/api/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Mobile number must be at least 10 digits long"
    );
}

#[tokio::test]
async fn test_signup_unknown_role_rejected() {
    let (app, _) = common::create_test_app();
    let mut body = jane_signup();
    body["role"] = json!("admin");

    let response = post_json(&app, "/api/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_input");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _) = common::create_test_app();

    let response = post_raw(&app, "/api/auth/signin", "{\"email\": ").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_input");
}

#[tokio::test]
async fn test_signup_session_opens_current_user() {
    let (app, _) = common::create_test_app();

    let response = post_json(&app, "/api/auth/signup", jane_signup()).await;
    let cookie = session_cookie_pair(&response);
    let created = body_json(response).await;

    let response = common::get_with_cookie(&app, "/api/user/current", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created["user"]);
}

/// POST a raw (possibly malformed) JSON body.
async fn post_raw(app: &axum::Router, uri: &str, body: &str) -> axum::response::Response {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

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
