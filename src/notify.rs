// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outbound email.
//!
//! Delivery is fire-and-forget: callers hand a message to [`dispatch`] and
//! carry on. A failed send is logged and never reaches the client.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::storage::Identity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}

/// Anything that can deliver an [`EmailMessage`].
///
/// `send` may block; [`dispatch`] runs it on the blocking pool.
pub trait Mailer: Send + Sync {
    fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Mailer that records each message as a tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "email sent"
        );
        Ok(())
    }
}

/// Confirmation message sent after signup.
pub fn signup_confirmation(identity: &Identity) -> EmailMessage {
    EmailMessage {
        to: identity.email.clone(),
        subject: "Confirm your email".to_string(),
        body: "Please confirm your email.".to_string(),
    }
}

/// Send `message` in the background.
pub fn dispatch(mailer: Arc<dyn Mailer>, message: EmailMessage) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        if let Err(e) = mailer.send(&message) {
            tracing::warn!(error = %e, to = %message.to, "email delivery failed");
        }
    })
}
