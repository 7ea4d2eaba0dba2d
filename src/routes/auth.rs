// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! Account and session routes, mounted under `/api/auth`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::config::SessionCookieConfig;
use crate::error::Result;
use crate::models::auth::{
    AckResponse, AuthResponse, ForgotPasswordRequest, GoogleAuthRequest, ResetPasswordRequest,
    SignInRequest, SignUpRequest, VerifyOtpRequest,
};
use crate::services::Session;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/signin", post(sign_in))
        .route("/signout", get(sign_out))
        .route("/forgot-password", post(forgot_password))
        .route("/verify-otp", post(verify_otp))
        .route("/reset-password", post(reset_password))
        .route("/google-auth", post(google_auth))
}

/// JSON body; parse failures surface as `AppError::InvalidInput` through `?`.
type Body<T> = std::result::Result<Json<T>, JsonRejection>;

/// Session cookie carrying `token`.
pub fn session_cookie(config: &SessionCookieConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.secure)
        .max_age(config.max_age())
        .build()
}

/// Removal cookie; attributes must match [`session_cookie`] for browsers to drop it.
pub fn removal_cookie(config: &SessionCookieConfig) -> Cookie<'static> {
    Cookie::build((config.name.clone(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.secure)
        .max_age(time::Duration::ZERO)
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .build()
}

fn signed_in(
    state: &AppState,
    jar: CookieJar,
    status: StatusCode,
    session: Session,
) -> (StatusCode, CookieJar, Json<AuthResponse>) {
    let jar = jar.add(session_cookie(&state.config.session_cookie, session.token));
    (
        status,
        jar,
        Json(AuthResponse {
            user: session.identity,
        }),
    )
}

/// Create a password account.
async fn sign_up(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Body<SignUpRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let Json(req) = body?;
    let session = state.credentials.register(req).await?;
    tracing::info!(user_id = %session.identity.id, "Signed up");
    Ok(signed_in(&state, jar, StatusCode::CREATED, session))
}

/// Sign in with email and password.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Body<SignInRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let Json(req) = body?;
    let session = state.credentials.authenticate(req).await?;
    tracing::info!(user_id = %session.identity.id, "Signed in");
    Ok(signed_in(&state, jar, StatusCode::OK, session))
}

/// Sign in with a Google-verified email, creating the account on first use.
async fn google_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Body<GoogleAuthRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let Json(req) = body?;
    let session = state.credentials.federated_authenticate(req).await?;
    tracing::info!(user_id = %session.identity.id, "Signed in with Google");
    Ok(signed_in(&state, jar, StatusCode::OK, session))
}

/// Sign out. Sessions are stateless, so this only clears the cookie.
async fn sign_out(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<AckResponse>) {
    let jar = jar.add(removal_cookie(&state.config.session_cookie));
    (jar, Json(AckResponse::new("Signout successfully")))
}

/// Step 1 of password reset: mail a code.
async fn forgot_password(
    State(state): State<Arc<AppState>>,
    body: Body<ForgotPasswordRequest>,
) -> Result<Json<AckResponse>> {
    let Json(req) = body?;
    state.credentials.request_password_reset(&req.email).await?;
    Ok(Json(AckResponse::new("OTP sent successfully")))
}

/// Step 2 of password reset: check the code.
async fn verify_otp(
    State(state): State<Arc<AppState>>,
    body: Body<VerifyOtpRequest>,
) -> Result<Json<AckResponse>> {
    let Json(req) = body?;
    state.credentials.verify_reset_code(&req.email, &req.otp).await?;
    Ok(Json(AckResponse::new("OTP verified successfully")))
}

/// Step 3 of password reset: set the new password.
async fn reset_password(
    State(state): State<Arc<AppState>>,
    body: Body<ResetPasswordRequest>,
) -> Result<Json<AckResponse>> {
    let Json(req) = body?;
    state.credentials.reset_password(req).await?;
    Ok(Json(AckResponse::new("Password reset successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_session_cookie_attributes() {
        let config = Config::test_default().session_cookie;
        let cookie = session_cookie(&config, "abc".to_string()).to_string();

        assert!(cookie.starts_with("token=abc"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_removal_cookie_matches_session_cookie() {
        let mut config = Config::test_default().session_cookie;
        config.secure = true;
        let cookie = removal_cookie(&config).to_string();

        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
