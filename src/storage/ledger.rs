// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Spending ledger: owner-scoped expense records.
//!
//! Every operation takes the caller's [`SessionContext`] explicitly; an
//! anonymous context fails with [`LedgerError::Unauthenticated`] before
//! anything else is looked at.
//!
//! Records are indexed by owner, so `list_mine` and `summary_mine` only ever
//! visit the caller's own records. Single-record reads and deletes go through
//! the ownership guard, and a delete performs lookup, guard and removal under
//! the same `&mut self` borrow.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ownership::{AccessError, OwnedResource, OwnershipCheck};
use crate::auth::{SessionContext, Unauthenticated};

/// System-assigned spending identifier.
pub type SpendingId = u64;

/// Maximum number of fractional digits kept for an amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Largest accepted amount (10^15).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Date format accepted for spendings.
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    InvalidAmount(String),

    #[error("{0}")]
    InvalidCategory(String),

    #[error("{0}")]
    InvalidDate(String),

    #[error("Spending not found")]
    NotFound,

    #[error("Not authorized to access this spending")]
    NotOwner,

    #[error("Spending total is out of range")]
    TotalOverflow,
}

impl From<Unauthenticated> for LedgerError {
    fn from(_: Unauthenticated) -> Self {
        LedgerError::Unauthenticated
    }
}

impl From<AccessError> for LedgerError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotFound => LedgerError::NotFound,
            AccessError::NotOwner => LedgerError::NotOwner,
        }
    }
}

/// Spending categories. The set is closed; unknown names are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Food,
    Transport,
    Utilities,
    Entertainment,
    Health,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Utilities,
        Category::Entertainment,
        Category::Health,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "FOOD",
            Category::Transport => "TRANSPORT",
            Category::Utilities => "UTILITIES",
            Category::Entertainment => "ENTERTAINMENT",
            Category::Health => "HEALTH",
            Category::Other => "OTHER",
        }
    }
}

/// Returned when a category name is not part of the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Exact, case-sensitive match on the upper-case names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored spending record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spending {
    pub id: SpendingId,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub category: Category,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl OwnedResource for Spending {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

/// Spending fields as sent by a client, before validation.
///
/// `amount` may be a JSON string (`"12.50"`) or number (`12.5`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SpendingInput {
    #[schema(value_type = Option<String>, example = "12.50")]
    pub amount: Option<serde_json::Value>,
    pub description: Option<String>,
    #[schema(example = "FOOD")]
    pub category: Option<String>,
    #[schema(example = "2024-01-05")]
    pub date: Option<String>,
}

/// Validated spending fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpending {
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub category: Category,
}

impl NewSpending {
    /// Validate amount, then category, then date.
    pub fn parse(input: &SpendingInput) -> Result<Self, LedgerError> {
        let amount = parse_amount(input.amount.as_ref())?;

        let category = match input.category.as_deref() {
            Some(raw) => raw
                .parse::<Category>()
                .map_err(|e| LedgerError::InvalidCategory(e.to_string()))?,
            None => {
                return Err(LedgerError::InvalidCategory(
                    "Category is required".to_string(),
                ))
            }
        };

        let date = match input.date.as_deref() {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
                LedgerError::InvalidDate(format!("Invalid date {raw:?} (expected YYYY-MM-DD)"))
            })?,
            None => return Err(LedgerError::InvalidDate("Date is required".to_string())),
        };

        Ok(Self {
            amount,
            description: input.description.clone().unwrap_or_default(),
            date,
            category,
        })
    }
}

fn parse_amount(raw: Option<&serde_json::Value>) -> Result<Decimal, LedgerError> {
    let text = match raw {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(other) => {
            return Err(LedgerError::InvalidAmount(format!(
                "Amount must be a decimal string or number, got {other}"
            )))
        }
        None => return Err(LedgerError::InvalidAmount("Amount is required".to_string())),
    };

    let invalid = || LedgerError::InvalidAmount(format!("Invalid amount {text:?}"));

    // from_str would round away digits past the 28th decimal place.
    let mut amount = Decimal::from_str_exact(&text).map_err(|_| invalid())?.normalize();
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(LedgerError::InvalidAmount(
            "Amount must not be negative".to_string(),
        ));
    }
    if amount.scale() > AMOUNT_SCALE {
        return Err(LedgerError::InvalidAmount(format!(
            "Amount must have at most {AMOUNT_SCALE} decimal places"
        )));
    }

    if amount > MAX_AMOUNT {
        return Err(LedgerError::InvalidAmount(format!(
            "Amount must not exceed {MAX_AMOUNT}"
        )));
    }

    amount.set_sign_positive(true);
    amount.rescale(AMOUNT_SCALE);
    if amount.scale() != AMOUNT_SCALE {
        return Err(invalid());
    }
    Ok(amount)
}

/// Per-category total inside a [`SpendingSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategoryTotal {
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total: Decimal,
}

/// Totals over the caller's spendings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SpendingSummary {
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub count: usize,
    /// Categories with at least one spending, largest total first.
    pub by_category: Vec<CategoryTotal>,
}

/// In-process spending ledger.
#[derive(Default)]
pub struct SpendingLedger {
    records: HashMap<SpendingId, Spending>,
    /// Ids are handed out in increasing order, so each set iterates in
    /// insertion order.
    by_owner: HashMap<Uuid, BTreeSet<SpendingId>>,
    last_id: SpendingId,
}

impl SpendingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a spending owned by the session identity.
    pub fn add(
        &mut self,
        session: &SessionContext,
        input: &SpendingInput,
    ) -> Result<Spending, LedgerError> {
        let owner = session.require()?;
        let draft = NewSpending::parse(input)?;

        self.last_id += 1;
        let spending = Spending {
            id: self.last_id,
            amount: draft.amount,
            description: draft.description,
            date: draft.date,
            category: draft.category,
            owner_id: owner.id,
            created_at: Utc::now(),
        };

        self.by_owner
            .entry(owner.id)
            .or_default()
            .insert(spending.id);
        self.records.insert(spending.id, spending.clone());

        Ok(spending)
    }

    /// The caller's spendings in insertion order.
    pub fn list_mine(&self, session: &SessionContext) -> Result<Vec<Spending>, LedgerError> {
        let owner = session.require()?;
        Ok(self.owned_by(owner.id).cloned().collect())
    }

    pub fn get(&self, session: &SessionContext, id: SpendingId) -> Result<Spending, LedgerError> {
        let caller = session.require()?;
        let spending = self.records.get(&id).verify_owner(caller)?;
        Ok(spending.clone())
    }

    /// Remove a spending the caller owns and return it.
    pub fn delete(
        &mut self,
        session: &SessionContext,
        id: SpendingId,
    ) -> Result<Spending, LedgerError> {
        let caller = session.require()?;
        self.records.get(&id).verify_owner(caller)?;

        let removed = self.records.remove(&id).ok_or(LedgerError::NotFound)?;
        if let Some(ids) = self.by_owner.get_mut(&removed.owner_id) {
            ids.remove(&id);
        }
        Ok(removed)
    }

    pub fn summary_mine(&self, session: &SessionContext) -> Result<SpendingSummary, LedgerError> {
        let owner = session.require()?;

        let mut totals: HashMap<Category, Decimal> = HashMap::new();
        let mut total = Decimal::ZERO;
        let mut count = 0;
        for spending in self.owned_by(owner.id) {
            let category_total = totals.entry(spending.category).or_default();
            *category_total = category_total
                .checked_add(spending.amount)
                .ok_or(LedgerError::TotalOverflow)?;
            total = total
                .checked_add(spending.amount)
                .ok_or(LedgerError::TotalOverflow)?;
            count += 1;
        }

        let mut by_category: Vec<CategoryTotal> = Category::ALL
            .into_iter()
            .filter_map(|category| {
                totals
                    .get(&category)
                    .map(|total| CategoryTotal { category, total: *total })
            })
            .collect();
        // Stable sort keeps the enum order for equal totals.
        by_category.sort_by(|a, b| b.total.cmp(&a.total));

        Ok(SpendingSummary {
            total,
            count,
            by_category,
        })
    }

    /// Total number of records across all owners.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn owned_by(&self, owner: Uuid) -> impl Iterator<Item = &Spending> {
        self.by_owner
            .get(&owner)
            .into_iter()
            .flatten()
            .filter_map(|id| self.records.get(id))
    }
}
