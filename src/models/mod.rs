// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! Data models for the application.

pub mod auth;
pub mod user;

pub use user::{EmailIndex, Identity, ResetGrantClaim, Role, User};
