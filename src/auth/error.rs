// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Why a bearer token was refused.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("token has expired")]
    Expired,
}

/// Raised when an operation needs an identity and the session has none.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
#[error("no authenticated session")]
pub struct Unauthenticated;

/// Authentication error type.
///
/// The variants keep the precise reason for logs and tests. Responses do not:
/// every token or header problem renders the same `unauthenticated` body, and
/// unknown users and wrong passwords render the same `invalid_credentials`
/// body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Invalid authorization header format
    InvalidAuthHeader,
    /// Token failed verification
    InvalidToken(TokenError),
    /// Token subject no longer resolves to an identity
    UnknownSubject,
    /// Operation requires an authenticated session
    Unauthenticated,
    /// Username/password pair rejected at signin
    InvalidCredentials,
    /// Signin body could not be read
    InvalidRequest(String),
    /// Internal error
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken(_)
            | AuthError::UnknownSubject
            | AuthError::Unauthenticated => "unauthenticated",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidRequest(_) => "invalid_request",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Message shown to clients.
    pub fn public_message(&self) -> &str {
        match self {
            AuthError::InvalidCredentials => "Invalid username or password",
            AuthError::InvalidRequest(msg) => msg,
            AuthError::InternalError(_) => "Internal authentication error",
            _ => "Authentication required",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::InvalidToken(reason) => write!(f, "Invalid token: {reason}"),
            AuthError::UnknownSubject => write!(f, "Token subject does not match any account"),
            AuthError::Unauthenticated => write!(f, "Authentication required"),
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
            AuthError::InvalidRequest(msg) => write!(f, "Invalid request: {msg}"),
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::InvalidToken(err)
    }
}

impl From<Unauthenticated> for AuthError {
    fn from(_: Unauthenticated) -> Self {
        AuthError::Unauthenticated
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.public_message().to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
