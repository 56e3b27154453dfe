// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Demo account seeding.
//!
//! Creates `demo` / `password` with a few months of random spendings so a
//! fresh server has something to show. Goes through the same store and
//! ledger operations as the API.

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use crate::auth::{PasswordError, SessionContext};
use crate::state::AppState;
use crate::storage::{Category, CredentialError, LedgerError, SpendingInput};

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password";

/// Spendings created alongside the demo account.
pub const DEMO_SPENDINGS: usize = 60;

/// How far back demo spending dates reach.
const DEMO_HISTORY_DAYS: i64 = 90;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Ensure the demo account exists.
///
/// Returns `false` without touching anything if it already does.
pub async fn seed_demo_data(state: &AppState) -> Result<bool, SeedError> {
    if state
        .credentials
        .read()
        .await
        .find_by_username(DEMO_USERNAME)
        .is_some()
    {
        tracing::debug!("demo account already present");
        return Ok(false);
    }

    let hasher = state.hasher.clone();
    let digest = tokio::task::spawn_blocking(move || hasher.hash(DEMO_PASSWORD)).await??;
    let identity = state
        .credentials
        .write()
        .await
        .register(DEMO_USERNAME, DEMO_EMAIL, digest)?;

    let today = Utc::now().date_naive();
    let inputs: Vec<SpendingInput> = {
        let mut rng = rand::rng();
        (1..=DEMO_SPENDINGS)
            .map(|n| demo_spending(&mut rng, n, today))
            .collect()
    };

    let session = SessionContext::Authenticated(identity);
    let mut ledger = state.ledger.write().await;
    for input in &inputs {
        ledger.add(&session, input)?;
    }

    tracing::info!(
        username = DEMO_USERNAME,
        spendings = inputs.len(),
        "demo data seeded"
    );
    Ok(true)
}

fn demo_spending(rng: &mut impl Rng, n: usize, today: NaiveDate) -> SpendingInput {
    // 5.00 ..= 105.00
    let amount = Decimal::new(rng.random_range(500..=10_500), 2);
    let category = Category::ALL[rng.random_range(0..Category::ALL.len())];
    let date = today - Duration::days(rng.random_range(0..DEMO_HISTORY_DAYS));

    SpendingInput {
        amount: Some(serde_json::Value::String(amount.to_string())),
        description: Some(format!("Sample expense {n}")),
        category: Some(category.as_str().to_string()),
        date: Some(date.format("%Y-%m-%d").to_string()),
    }
}
