// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store: registered identities and their password digests.
//!
//! Username and email are both unique. The uniqueness checks and the insert
//! happen inside one `&mut self` call, so as long as the store sits behind a
//! write lock no two registrations for the same username or email can both
//! succeed.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::PasswordDigest;

/// Credential registration errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("Email is already in use")]
    DuplicateEmail,

    /// Signup payload failed validation.
    #[error("{0}")]
    Invalid(&'static str),
}

/// A registered user.
///
/// The password digest is only reachable from inside the crate and is
/// redacted from `Debug` output. `Identity` deliberately has no `Serialize`
/// impl; API responses use their own view types.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    password_hash: PasswordDigest,
}

impl Identity {
    pub(crate) fn password_hash(&self) -> &PasswordDigest {
        &self.password_hash
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Check a signup payload before any hashing work is done.
pub fn validate_signup(username: &str, email: &str, password: &str) -> Result<(), CredentialError> {
    if username.trim().is_empty() {
        return Err(CredentialError::Invalid("Username must not be blank"));
    }
    if password.is_empty() {
        return Err(CredentialError::Invalid("Password must not be blank"));
    }
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(CredentialError::Invalid("Email address is not valid")),
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// In-process credential store.
#[derive(Default)]
pub struct CredentialStore {
    identities: HashMap<Uuid, Identity>,
    by_username: HashMap<String, Uuid>,
    /// Keyed by lowercase email.
    by_email: HashMap<String, Uuid>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new identity.
    ///
    /// The username conflict is reported first when both fields collide.
    pub fn register(
        &mut self,
        username: &str,
        email: &str,
        password_hash: PasswordDigest,
    ) -> Result<Identity, CredentialError> {
        self.ensure_available(username, email)?;

        let identity = Identity {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.trim().to_string(),
            created_at: Utc::now(),
            password_hash,
        };

        self.by_username.insert(identity.username.clone(), identity.id);
        self.by_email.insert(email_key(email), identity.id);
        self.identities.insert(identity.id, identity.clone());

        Ok(identity)
    }

    /// Check that neither the username nor the email is taken.
    ///
    /// Lets callers skip password hashing for an obvious conflict. Only the
    /// check inside [`register`](Self::register) is authoritative.
    pub fn ensure_available(&self, username: &str, email: &str) -> Result<(), CredentialError> {
        if self.by_username.contains_key(username) {
            return Err(CredentialError::DuplicateUsername);
        }
        if self.by_email.contains_key(&email_key(email)) {
            return Err(CredentialError::DuplicateEmail);
        }
        Ok(())
    }

    pub fn find_by_username(&self, username: &str) -> Option<Identity> {
        self.by_username
            .get(username)
            .and_then(|id| self.identities.get(id))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}
