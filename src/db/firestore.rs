// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (identity records, including password-reset state)
//! - User emails (uniqueness index, `user_emails/{email}` → user id)
//! - Reset grants (single-use claims on a verified password reset)
//!
//! A process-local backend backs the same API for offline tests and
//! local development.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use firestore::FirestoreWritePrecondition;

use crate::db::collections;
use crate::error::AppError;
use crate::models::{EmailIndex, ResetGrantClaim, User};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(Arc<MemoryStore>),
}

/// In-memory documents, keyed the same way as the Firestore collections.
#[derive(Default)]
struct MemoryStore {
    users: DashMap<String, User>,
    user_emails: DashMap<String, String>,
    reset_grants: DashMap<String, String>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create an in-memory store (offline mode).
    ///
    /// Data lives as long as the returned handle and its clones.
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::default())),
        }
    }

    /// Document ID for an email. Firestore IDs may not contain `/`.
    fn email_doc_id(email: &str) -> String {
        urlencoding::encode(email).into_owned()
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by identifier.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(collections::USERS)
                .obj()
                .one(user_id)
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(store) => Ok(store.users.get(user_id).map(|u| u.clone())),
        }
    }

    /// Find a user by email through the uniqueness index.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user_id = match &self.backend {
            Backend::Firestore(client) => {
                let index: Option<EmailIndex> = client
                    .fluent()
                    .select()
                    .by_id_in(collections::USER_EMAILS)
                    .obj()
                    .one(&Self::email_doc_id(email))
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                index.map(|i| i.user_id)
            }
            Backend::Memory(store) => store.user_emails.get(email).map(|id| id.clone()),
        };

        match user_id {
            Some(id) => self.get_user(&id).await,
            None => Ok(None),
        }
    }

    /// Create a new user, claiming its email.
    ///
    /// Returns [`AppError::Conflict`] if the email is already taken. The email
    /// claim and the user document are written in one transaction, and the
    /// claim carries a must-not-exist precondition so concurrent sign-ups for
    /// the same email cannot both succeed.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let email_id = Self::email_doc_id(&user.email);

                let existing: Option<EmailIndex> = client
                    .fluent()
                    .select()
                    .by_id_in(collections::USER_EMAILS)
                    .obj()
                    .one(&email_id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                if existing.is_some() {
                    return Err(AppError::Conflict);
                }

                let mut transaction = client.begin_transaction().await.map_err(|e| {
                    AppError::Database(format!("Failed to begin transaction: {}", e))
                })?;

                client
                    .fluent()
                    .update()
                    .in_col(collections::USER_EMAILS)
                    .precondition(FirestoreWritePrecondition::Exists(false))
                    .document_id(&email_id)
                    .object(&EmailIndex {
                        user_id: user.id.clone(),
                    })
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!("Failed to add email claim to transaction: {}", e))
                    })?;

                client
                    .fluent()
                    .update()
                    .in_col(collections::USERS)
                    .precondition(FirestoreWritePrecondition::Exists(false))
                    .document_id(&user.id)
                    .object(user)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!("Failed to add user to transaction: {}", e))
                    })?;

                transaction.commit().await.map_err(|e| match e {
                    firestore::errors::FirestoreError::DataConflictError(_) => AppError::Conflict,
                    other => AppError::Database(format!("Transaction commit failed: {}", other)),
                })?;
            }
            Backend::Memory(store) => match store.user_emails.entry(user.email.clone()) {
                Entry::Occupied(_) => return Err(AppError::Conflict),
                Entry::Vacant(slot) => {
                    slot.insert(user.id.clone());
                    store.users.insert(user.id.clone(), user.clone());
                }
            },
        }

        tracing::info!(user_id = %user.id, role = ?user.role, "User created");
        Ok(())
    }

    /// Overwrite an existing user document.
    ///
    /// Email is not re-indexed; it never changes after creation.
    pub async fn save_user(&self, user: &User) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::USERS)
                    .document_id(&user.id)
                    .object(user)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
            Backend::Memory(store) => {
                store.users.insert(user.id.clone(), user.clone());
            }
        }
        Ok(())
    }

    // ─── Reset Grants ────────────────────────────────────────────

    /// Spend a reset grant. Succeeds for exactly one caller per grant;
    /// every later or concurrent caller gets [`AppError::Conflict`].
    pub async fn claim_reset_grant(&self, grant: &str, user_id: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let claim = ResetGrantClaim {
                    user_id: user_id.to_string(),
                    claimed_at: crate::time_utils::format_utc_rfc3339(chrono::Utc::now()),
                };
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::RESET_GRANTS)
                    .precondition(FirestoreWritePrecondition::Exists(false))
                    .document_id(grant)
                    .object(&claim)
                    .execute()
                    .await
                    .map_err(|e| match e {
                        firestore::errors::FirestoreError::DataConflictError(_) => {
                            AppError::Conflict
                        }
                        other => AppError::Database(other.to_string()),
                    })?;
            }
            Backend::Memory(store) => match store.reset_grants.entry(grant.to_string()) {
                Entry::Occupied(_) => return Err(AppError::Conflict),
                Entry::Vacant(slot) => {
                    slot.insert(user_id.to_string());
                }
            },
        }
        Ok(())
    }
}
