//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Email → user id, enforces unique emails
    pub const USER_EMAILS: &str = "user_emails";
    /// Spent password-reset grants
    pub const RESET_GRANTS: &str = "reset_grants";
}
