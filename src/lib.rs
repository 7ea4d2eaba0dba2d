// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! Vingo Auth: account and session backend for the Vingo food-delivery app
//!
//! This crate provides sign-up, sign-in, Google sign-in and OTP password
//! reset over a Firestore identity store, with sessions carried in a signed
//! HTTP-only cookie.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{CredentialService, MailService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub mail: MailService,
    pub credentials: CredentialService,
}

impl AppState {
    pub fn new(config: Config, db: FirestoreDb, mail: MailService) -> Self {
        let credentials = CredentialService::new(&config, db.clone(), mail.clone());
        Self {
            config,
            db,
            mail,
            credentials,
        }
    }
}
