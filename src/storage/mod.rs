// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! In-process keyed stores for identities and spendings. Both live behind an
//! `Arc<RwLock<_>>` in [`AppState`](crate::state::AppState); every mutating
//! operation takes `&mut self`, which makes the write lock the unit of
//! atomicity:
//!
//! - registration checks username/email uniqueness and inserts in one call
//! - deletion looks up, checks ownership and removes in one call
//!
//! ## Layout
//!
//! ```text
//! CredentialStore
//!   identities   id -> Identity (with password digest)
//!   by_username  username -> id
//!   by_email     lowercase email -> id
//! SpendingLedger
//!   records      spending id -> Spending
//!   by_owner     identity id -> ordered spending ids
//! ```

pub mod credentials;
pub mod ledger;
pub mod ownership;

pub use credentials::{validate_signup, CredentialError, CredentialStore, Identity};
pub use ledger::{
    Category, CategoryTotal, LedgerError, NewSpending, Spending, SpendingId, SpendingInput,
    SpendingLedger, SpendingSummary,
};
pub use ownership::{AccessError, OwnedResource, OwnershipCheck, OwnershipEnforcer};
