// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! Argon2 password hashing.
//!
//! Both operations are CPU-bound; async callers go through the `_blocking`
//! wrappers, which run them on Tokio's blocking pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

/// Hash a password into a PHC string.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("argon2 hash_password error: {}", e)))
}

/// Check a password against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch; errors only if the stored hash is unparseable.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("argon2 parse hash error: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

pub async fn hash_password_blocking(plain: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("hashing task failed: {}", e)))?
}

pub async fn verify_password_blocking(plain: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("verify task failed: {}", e)))?
}
