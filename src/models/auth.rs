// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! Request and response bodies for the `/api/auth` endpoints.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidateEmail, ValidationErrors};

use crate::error::AppError;
use crate::models::user::{Identity, Role};

/// `POST /signup`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub full_name: String,
    pub email: String,
    #[validate(length(
        min = 6,
        message = "Password must be at least 6 characters long"
    ))]
    pub password: String,
    #[validate(length(
        min = 10,
        message = "Mobile number must be at least 10 digits long"
    ))]
    pub mobile: String,
    #[serde(default)]
    pub role: Role,
}

/// `POST /signin`
#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// `POST /google-auth`
///
/// The sign-in page only forwards the email; the sign-up page also sends
/// the profile fields needed to create an account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAuthRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// `POST /forgot-password`
#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// `POST /verify-otp`
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

/// `POST /reset-password`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    #[validate(length(
        min = 6,
        message = "Password must be at least 6 characters long"
    ))]
    pub new_password: String,
}

/// Response carrying the signed-in identity.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub user: Identity,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AckResponse {
    pub message: String,
}

impl AckResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Reject an empty or malformed email before it is used as a lookup key.
pub fn check_email(email: &str) -> Result<(), AppError> {
    if email.trim().is_empty() {
        return Err(AppError::InvalidInput("Email is required".to_string()));
    }
    if !email.validate_email() {
        return Err(AppError::InvalidInput("Invalid email address".to_string()));
    }
    Ok(())
}

/// Run validation and report the first failing field, checked in `order`.
pub fn validate_fields<T: Validate>(value: &T, order: &[&str]) -> Result<(), AppError> {
    value
        .validate()
        .map_err(|errors| AppError::InvalidInput(first_message(&errors, order)))
}

fn first_message(errors: &ValidationErrors, order: &[&str]) -> String {
    let fields = errors.field_errors();
    order
        .iter()
        .filter_map(|name| fields.get(*name))
        .chain(fields.values())
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input".to_string())
}
