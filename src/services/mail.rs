// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! Outbound mail for password-reset codes.
//!
//! Uses SMTP via lettre. The mock backend keeps sent codes in memory so
//! tests can read them back.

use std::sync::Arc;

use dashmap::DashMap;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;

use crate::config::SmtpConfig;
use crate::error::AppError;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        AppError::Mail(err.to_string())
    }
}

#[derive(Clone)]
enum Backend {
    Smtp {
        mailer: AsyncSmtpTransport<Tokio1Executor>,
        from: Mailbox,
    },
    /// Recipient → codes sent, oldest first
    Mock(Arc<DashMap<String, Vec<String>>>),
}

/// Mail dispatch client.
#[derive(Clone)]
pub struct MailService {
    backend: Backend,
}

impl MailService {
    /// Create an SMTP-backed service (STARTTLS relay).
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let from: Mailbox = config
            .from_address
            .parse()
            .map_err(|_| MailError::InvalidAddress(config.from_address.clone()))?;

        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        tracing::info!(host = %config.host, port = config.port, "SMTP mailer initialized");

        Ok(Self {
            backend: Backend::Smtp { mailer, from },
        })
    }

    /// Create a mock service that records instead of sending (offline mode).
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Mock(Arc::new(DashMap::new())),
        }
    }

    /// Send a password-reset code.
    pub async fn send_reset_code(
        &self,
        to: &str,
        code: &str,
        valid_minutes: i64,
    ) -> Result<(), AppError> {
        match &self.backend {
            Backend::Smtp { mailer, from } => {
                let recipient: Mailbox = to
                    .parse()
                    .map_err(|_| MailError::InvalidAddress(to.to_string()))?;

                let email = Message::builder()
                    .from(from.clone())
                    .to(recipient)
                    .subject("Reset Your Password")
                    .multipart(MultiPart::alternative_plain_html(
                        reset_text_body(code, valid_minutes),
                        reset_html_body(code, valid_minutes),
                    ))
                    .map_err(MailError::from)?;

                mailer.send(email).await.map_err(MailError::from)?;
            }
            Backend::Mock(outbox) => {
                outbox.entry(to.to_string()).or_default().push(code.to_string());
            }
        }

        tracing::info!(to = %to, "Password reset code sent");
        Ok(())
    }

    /// Most recent code sent to `to`. Always `None` for the SMTP backend.
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        match &self.backend {
            Backend::Smtp { .. } => None,
            Backend::Mock(outbox) => outbox.get(to).and_then(|codes| codes.last().cloned()),
        }
    }

    /// Number of codes sent to `to`. Always `0` for the SMTP backend.
    pub fn sent_count(&self, to: &str) -> usize {
        match &self.backend {
            Backend::Smtp { .. } => 0,
            Backend::Mock(outbox) => outbox.get(to).map(|codes| codes.len()).unwrap_or(0),
        }
    }
}

fn reset_text_body(code: &str, valid_minutes: i64) -> String {
    format!("Your OTP for password reset is {code}. It expires in {valid_minutes} minutes.")
}

fn reset_html_body(code: &str, valid_minutes: i64) -> String {
    format!(
        "<p>Your OTP for password reset is <b>{code}</b>. It expires in {valid_minutes} minutes.</p>"
    )
}
