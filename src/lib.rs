// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! FinMate - Personal Spending Tracker Service
//!
//! Multi-user spending ledger behind a JSON API. Users sign up with a
//! username, email and password, sign in for a bearer token, and record,
//! list and delete their own spendings.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password hashing, bearer tokens, per-request session
//! - `config` - Environment configuration
//! - `notify` - Outbound email
//! - `seed` - Demo account seeding
//! - `storage` - In-process credential store and spending ledger

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod seed;
pub mod state;
pub mod storage;
