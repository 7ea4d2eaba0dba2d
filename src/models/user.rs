// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Account role, fixed at creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Role {
    /// Ordinary customer
    #[default]
    #[serde(rename = "user")]
    User,
    /// Restaurant (business) owner
    #[serde(rename = "owner")]
    Owner,
    /// Delivery agent
    #[serde(rename = "deliveryBoy")]
    DeliveryAgent,
}

/// User record stored in Firestore (`users/{id}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Opaque identifier (also used as document ID)
    pub id: String,
    pub full_name: String,
    /// Unique across all users
    pub email: String,
    /// Argon2 PHC string; absent for accounts created through Google sign-in
    #[serde(default)]
    pub password_hash: Option<String>,
    pub mobile: String,
    pub role: Role,

    // ─── Password Reset ──────────────────────────────────────────
    /// Pending one-time code
    #[serde(default)]
    pub reset_otp: Option<String>,
    /// When the pending code stops being valid
    #[serde(default)]
    pub otp_expires_at: Option<DateTime<Utc>>,
    /// Set by a successful code check, cleared by the reset it authorizes
    #[serde(default)]
    pub is_otp_verified: bool,
    /// Identifies the verification that set `is_otp_verified`; a reset claims it once
    #[serde(default)]
    pub reset_grant: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Build a new record with a fresh identifier and no reset state.
    pub fn new(
        full_name: String,
        email: String,
        password_hash: Option<String>,
        mobile: String,
        role: Role,
    ) -> Self {
        let now = crate::time_utils::format_utc_rfc3339(Utc::now());
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            full_name,
            email,
            password_hash,
            mobile,
            role,
            reset_otp: None,
            otp_expires_at: None,
            is_otp_verified: false,
            reset_grant: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Refresh `updated_at` before a write.
    pub fn touch(&mut self) {
        self.updated_at = crate::time_utils::format_utc_rfc3339(Utc::now());
    }
}

/// Public projection of a [`User`]. Never carries the hash or reset fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Identity {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub role: Role,
    pub created_at: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            role: user.role,
            created_at: user.created_at.clone(),
        }
    }
}

/// Email uniqueness index entry (`user_emails/{email}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailIndex {
    pub user_id: String,
}

/// Marker that a reset grant was spent (`reset_grants/{grant}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetGrantClaim {
    pub user_id: String,
    pub claimed_at: String,
}
