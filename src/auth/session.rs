// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request session context.

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{AuthError, TokenService, Unauthenticated};
use crate::storage::{CredentialStore, Identity};

/// Who is making the current request.
///
/// Built once per request and never shared across requests. Ledger
/// operations take it by reference instead of reaching for ambient state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionContext {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl SessionContext {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionContext::Anonymous => None,
            SessionContext::Authenticated(identity) => Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }

    /// The current identity, or `Unauthenticated` if there is none.
    pub fn require(&self) -> Result<&Identity, Unauthenticated> {
        self.identity().ok_or(Unauthenticated)
    }
}

/// Resolve a bearer token to a stored identity.
///
/// The token is verified before the credential store is locked. A valid token
/// whose subject no longer exists fails with `UnknownSubject`.
pub async fn establish(
    token: &str,
    tokens: &TokenService,
    credentials: &RwLock<CredentialStore>,
    now: DateTime<Utc>,
) -> Result<Identity, AuthError> {
    let claims = tokens.verify_at(token, now)?;
    credentials
        .read()
        .await
        .find_by_username(&claims.sub)
        .ok_or(AuthError::UnknownSubject)
}
