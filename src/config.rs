// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup and shared through `AppState`. Cookie options live
//! here as plain values handed to the handlers that issue sessions.

use std::env;
use std::ops::RangeInclusive;

/// Accepted values for `SESSION_TTL_DAYS`.
const SESSION_TTL_DAYS: RangeInclusive<i64> = 1..=365;
/// Accepted values for `OTP_TTL_SECONDS`.
const OTP_TTL_SECONDS: RangeInclusive<i64> = 30..=86_400;

/// Which identity store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    /// Process-local store for development and offline tests.
    Memory,
}

/// Attributes of the session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookieConfig {
    /// Cookie name
    pub name: String,
    /// Lifetime in days (also the JWT lifetime)
    pub ttl_days: i64,
    /// Whether to set the `Secure` attribute
    pub secure: bool,
}

impl SessionCookieConfig {
    /// Default cookie name, shared with the frontend.
    pub const DEFAULT_NAME: &'static str = "token";

    pub fn max_age(&self) -> time::Duration {
        time::Duration::days(self.ttl_days)
    }
}

/// SMTP settings for OTP delivery.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address, e.g. `Vingo <no-reply@vingo.app>`
    pub from_address: String,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL (CORS origin, cookie security)
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Identity store backend
    pub store_backend: StoreBackend,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Session cookie attributes
    pub session_cookie: SessionCookieConfig,
    /// Lifetime of a password-reset code, in seconds
    pub otp_ttl_seconds: i64,
    /// Outbound mail
    pub smtp: SmtpConfig,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8000,
            store_backend: StoreBackend::Memory,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            session_cookie: SessionCookieConfig {
                name: SessionCookieConfig::DEFAULT_NAME.to_string(),
                ttl_days: 7,
                secure: false,
            },
            otp_ttl_seconds: 300,
            smtp: SmtpConfig {
                host: "localhost".to_string(),
                port: 2525,
                username: "test".to_string(),
                password: "test".to_string(),
                from_address: "Vingo <no-reply@vingo.test>".to_string(),
            },
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

        // Secure cookies whenever the frontend is served over HTTPS, unless overridden
        let secure = match env::var("COOKIE_SECURE") {
            Ok(v) => parse_bool("COOKIE_SECURE", &v)?,
            Err(_) => frontend_url.starts_with("https://"),
        };

        let store_backend = match env::var("IDENTITY_STORE").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            Ok("firestore") | Err(_) => StoreBackend::Firestore,
            Ok(other) => {
                return Err(ConfigError::Invalid {
                    name: "IDENTITY_STORE",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            frontend_url,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: parse_or("PORT", 8000)?,
            store_backend,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            session_cookie: SessionCookieConfig {
                name: SessionCookieConfig::DEFAULT_NAME.to_string(),
                ttl_days: parse_bounded("SESSION_TTL_DAYS", 7, SESSION_TTL_DAYS)?,
                secure,
            },
            otp_ttl_seconds: parse_bounded("OTP_TTL_SECONDS", 300, OTP_TTL_SECONDS)?,
            smtp: SmtpConfig {
                host: required("SMTP_HOST")?,
                port: parse_or("SMTP_PORT", 587)?,
                username: required("SMTP_USERNAME")?,
                password: required("SMTP_PASSWORD")?,
                from_address: required("MAIL_FROM")?,
            },
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| ConfigError::Missing(name))
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { name, value: v }),
        Err(_) => Ok(default),
    }
}

fn parse_bounded(
    name: &'static str,
    default: i64,
    range: RangeInclusive<i64>,
) -> Result<i64, ConfigError> {
    within(name, parse_or(name, default)?, range)
}

fn within(name: &'static str, value: i64, range: RangeInclusive<i64>) -> Result<i64, ConfigError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}
