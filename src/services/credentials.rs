// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! Credential lifecycle: sign-up, sign-in, Google sign-in and OTP password reset.
//!
//! Password reset is a strict three-step sequence, each step gated by state
//! the previous one left on the user record:
//!
//! 1. `request_password_reset` stores a fresh code with an expiry and clears
//!    any earlier verification.
//! 2. `verify_reset_code` consumes the code (single use) and sets the
//!    verified flag.
//! 3. `reset_password` requires the flag, replaces the hash and clears it.
//!
//! Nothing is retried; on any failure the caller starts again from step 1.

use chrono::{Duration, Utc};
use rand::Rng;
use subtle::ConstantTimeEq;

use crate::config::Config;
use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::auth::{
    check_email, validate_fields, GoogleAuthRequest, ResetPasswordRequest, SignInRequest, SignUpRequest,
};
use crate::models::{Identity, Role, User};
use crate::services::mail::MailService;
use crate::services::password;
use crate::time_utils::has_passed;

/// A signed-in identity together with its freshly issued session token.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,
    pub token: String,
}

/// Credential service.
#[derive(Clone)]
pub struct CredentialService {
    db: FirestoreDb,
    mail: MailService,
    jwt_signing_key: Vec<u8>,
    session_ttl_days: i64,
    otp_ttl: Duration,
}

impl CredentialService {
    pub fn new(config: &Config, db: FirestoreDb, mail: MailService) -> Self {
        Self {
            db,
            mail,
            jwt_signing_key: config.jwt_signing_key.clone(),
            session_ttl_days: config.session_cookie.ttl_days,
            otp_ttl: Duration::seconds(config.otp_ttl_seconds),
        }
    }

    fn issue_session(&self, user: &User) -> Result<Session> {
        let token = create_jwt(&user.id, &self.jwt_signing_key, self.session_ttl_days)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;
        Ok(Session {
            identity: Identity::from(user),
            token,
        })
    }

    async fn require_user(&self, email: &str) -> Result<User> {
        self.db
            .find_user_by_email(email)
            .await?
            .ok_or(AppError::NotFound)
    }

    // ─── Sign-up / Sign-in ───────────────────────────────────────

    /// Create a password account and sign it in.
    pub async fn register(&self, req: SignUpRequest) -> Result<Session> {
        check_email(&req.email)?;
        if self.db.find_user_by_email(&req.email).await?.is_some() {
            return Err(AppError::Conflict);
        }
        validate_fields(&req, &["password", "mobile"])?;

        let hash = password::hash_password_blocking(req.password).await?;
        let user = User::new(req.full_name, req.email, Some(hash), req.mobile, req.role);
        self.db.create_user(&user).await?;

        self.issue_session(&user)
    }

    /// Check an email/password pair and sign it in.
    pub async fn authenticate(&self, req: SignInRequest) -> Result<Session> {
        check_email(&req.email)?;
        let user = self.require_user(&req.email).await?;

        // Accounts created through Google have no hash and never match
        let matches = match &user.password_hash {
            Some(hash) => password::verify_password_blocking(req.password, hash.clone()).await?,
            None => false,
        };
        if !matches {
            tracing::info!(user_id = %user.id, "Rejected sign-in: password mismatch");
            return Err(AppError::InvalidCredential);
        }

        self.issue_session(&user)
    }

    /// Sign in with an email vouched for by Google, creating the account on
    /// first use. Such accounts have no password until one is set through
    /// the reset flow.
    pub async fn federated_authenticate(&self, req: GoogleAuthRequest) -> Result<Session> {
        check_email(&req.email)?;
        if let Some(user) = self.db.find_user_by_email(&req.email).await? {
            return self.issue_session(&user);
        }

        let full_name = req
            .full_name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AppError::InvalidInput("Full name is required".to_string()))?;
        let mobile = req
            .mobile
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| AppError::InvalidInput("Mobile number is required".to_string()))?;

        let user = User::new(
            full_name,
            req.email,
            None,
            mobile,
            req.role.unwrap_or(Role::User),
        );

        match self.db.create_user(&user).await {
            Ok(()) => self.issue_session(&user),
            // Lost a race with a concurrent first login for the same email
            Err(AppError::Conflict) => {
                let existing = self.require_user(&user.email).await?;
                self.issue_session(&existing)
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve an authenticated user ID to its identity.
    pub async fn current_user(&self, user_id: &str) -> Result<Identity> {
        self.db
            .get_user(user_id)
            .await?
            .map(|u| Identity::from(&u))
            .ok_or(AppError::NotFound)
    }

    // ─── Password Reset ──────────────────────────────────────────

    /// Step 1: store and mail a fresh code, replacing any pending one.
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        check_email(email)?;
        let mut user = self.require_user(email).await?;

        let code = generate_otp();
        user.reset_otp = Some(code.clone());
        user.otp_expires_at = Some(Utc::now() + self.otp_ttl);
        user.is_otp_verified = false;
        user.reset_grant = None;
        user.touch();
        self.db.save_user(&user).await?;

        self.mail
            .send_reset_code(&user.email, &code, self.otp_ttl.num_minutes())
            .await?;

        tracing::info!(user_id = %user.id, "Password reset code issued");
        Ok(())
    }

    /// Step 2: consume a matching, unexpired code.
    pub async fn verify_reset_code(&self, email: &str, code: &str) -> Result<()> {
        check_email(email)?;
        let mut user = self.require_user(email).await?;

        let now = Utc::now();
        let code_matches = user
            .reset_otp
            .as_deref()
            .map(|stored| bool::from(stored.as_bytes().ct_eq(code.as_bytes())))
            .unwrap_or(false);
        let expired = user
            .otp_expires_at
            .map(|deadline| has_passed(deadline, now))
            .unwrap_or(true);

        if !code_matches || expired {
            tracing::info!(user_id = %user.id, expired, "Rejected password reset code");
            return Err(AppError::InvalidOrExpired);
        }

        user.is_otp_verified = true;
        user.reset_grant = Some(uuid::Uuid::new_v4().to_string());
        user.reset_otp = None;
        user.otp_expires_at = None;
        user.touch();
        self.db.save_user(&user).await?;

        Ok(())
    }

    /// Step 3: set a new password, once per verified code.
    ///
    /// The grant left by step 2 is claimed before hashing, so of several
    /// concurrent resets only one gets past this point.
    pub async fn reset_password(&self, req: ResetPasswordRequest) -> Result<()> {
        validate_fields(&req, &["new_password"])?;
        check_email(&req.email)?;

        let (mut user, grant) = match self.db.find_user_by_email(&req.email).await? {
            Some(user) if user.is_otp_verified => match user.reset_grant.clone() {
                Some(grant) => (user, grant),
                None => return Err(AppError::NotAuthorized),
            },
            _ => return Err(AppError::NotAuthorized),
        };

        match self.db.claim_reset_grant(&grant, &user.id).await {
            Ok(()) => {}
            Err(AppError::Conflict) => {
                tracing::info!(user_id = %user.id, "Rejected reset: grant already spent");
                return Err(AppError::NotAuthorized);
            }
            Err(e) => return Err(e),
        }

        user.password_hash = Some(password::hash_password_blocking(req.new_password).await?);
        user.is_otp_verified = false;
        user.reset_grant = None;
        user.touch();
        self.db.save_user(&user).await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }
}

/// Generate a 6-digit reset code, uniform over 100000–999999.
pub fn generate_otp() -> String {
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    code.to_string()
}
