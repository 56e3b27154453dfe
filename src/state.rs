// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::AppConfig;
use crate::notify::{LogMailer, Mailer};
use crate::storage::{CredentialStore, SpendingLedger};

#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<RwLock<CredentialStore>>,
    pub ledger: Arc<RwLock<SpendingLedger>>,
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(tokens: TokenService, hasher: PasswordHasher) -> Self {
        Self {
            credentials: Arc::new(RwLock::new(CredentialStore::new())),
            ledger: Arc::new(RwLock::new(SpendingLedger::new())),
            tokens: Arc::new(tokens),
            hasher,
            mailer: Arc::new(LogMailer),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            TokenService::new(&config.jwt_secret, config.token_ttl),
            PasswordHasher::default(),
        )
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }
}

/// State with a fixed secret and a cheap hasher.
#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    use crate::config::SigningSecret;

    AppState::new(
        TokenService::new(
            &SigningSecret::new(b"test-secret-test-secret-test-secret!".to_vec()),
            chrono::Duration::hours(1),
        ),
        PasswordHasher::with_cost(1024, 1, 1).expect("valid test cost"),
    )
}
