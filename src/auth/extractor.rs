// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the request session.
//!
//! `Session` never rejects: a missing or bad token yields an anonymous
//! session, and the operation decides whether that is acceptable. `Auth`
//! rejects with 401 when there is no identity.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity is the signed-in user
//! }
//! ```

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;

use super::{establish, AuthError, SessionContext};
use crate::state::AppState;
use crate::storage::Identity;

/// Session context for the current request.
pub struct Session(pub SessionContext);

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Resolved once per request
        if let Some(session) = parts.extensions.get::<SessionContext>().cloned() {
            return Ok(Session(session));
        }

        let session = match authenticate(parts, state).await {
            Ok(identity) => SessionContext::Authenticated(identity),
            Err(AuthError::MissingAuthHeader) => SessionContext::Anonymous,
            Err(reason) => {
                tracing::debug!(%reason, "bearer token refused, continuing anonymously");
                SessionContext::Anonymous
            }
        };

        parts.extensions.insert(session.clone());
        Ok(Session(session))
    }
}

/// Extractor for signed-in users.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(Auth(identity): Auth) -> Json<UserResponse> {
///     Json(UserResponse::from(&identity))
/// }
/// ```
pub struct Auth(pub Identity);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Session(session) = match Session::from_request_parts(parts, state).await {
            Ok(session) => session,
            Err(never) => match never {},
        };
        let identity = session.require()?;
        Ok(Auth(identity.clone()))
    }
}

async fn authenticate(parts: &Parts, state: &AppState) -> Result<Identity, AuthError> {
    let token = bearer_token(parts)?;
    establish(token, &state.tokens, &state.credentials, Utc::now()).await
}

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::InvalidAuthHeader)?;

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}
