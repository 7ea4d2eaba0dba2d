// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! Services module - business logic layer.

pub mod credentials;
pub mod mail;
pub mod password;

pub use credentials::{CredentialService, Session};
pub use mail::{MailError, MailService};
