// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! Routes for signed-in users. The session gate is applied in routes/mod.rs.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Identity;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/user/current", get(get_current_user))
}

/// Identity of the signed-in user.
async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Identity>> {
    let identity = state.credentials.current_user(&user.user_id).await?;
    Ok(Json(identity))
}
