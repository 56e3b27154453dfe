// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the REST API. Storage types never go on
//! the wire directly: [`Identity`] has no serializer at all, and spendings are
//! rendered through [`SpendingResponse`] so the owner id stays server-side.
//!
//! ## Model Categories
//!
//! - **Auth**: signup, signin and the current user
//! - **Spendings**: ledger records and the add/delete acknowledgements

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::storage::{Category, Identity, Spending, SpendingId};

// =============================================================================
// Auth
// =============================================================================

/// Signup payload. Missing fields are treated as blank.
#[derive(Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SignupRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

#[derive(Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

/// Bearer token returned by signin.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TokenResponse {
    pub token: String,
    /// Always `Bearer`.
    #[serde(rename = "type")]
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(token: String) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&Identity> for UserResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username.clone(),
            email: identity.email.clone(),
        }
    }
}

// =============================================================================
// Generic acknowledgements
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Spendings
// =============================================================================

/// A spending as returned to its owner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SpendingResponse {
    pub id: SpendingId,
    /// Two-decimal amount, rendered as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 12.5)]
    pub amount: Decimal,
    pub description: String,
    #[schema(value_type = String, example = "2024-01-05")]
    pub date: NaiveDate,
    pub category: Category,
}

impl From<Spending> for SpendingResponse {
    fn from(spending: Spending) -> Self {
        Self {
            id: spending.id,
            amount: spending.amount,
            description: spending.description,
            date: spending.date,
            category: spending.category,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AddSpendingResponse {
    pub message: String,
    pub spending: SpendingResponse,
}
