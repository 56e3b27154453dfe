// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    auth::{Auth, AuthError},
    error::ApiError,
    models::{MessageResponse, SigninRequest, SignupRequest, TokenResponse, UserResponse},
    notify,
    state::AppState,
    storage::validate_signup,
};

pub const SIGNUP_MESSAGE: &str =
    "User registered successfully! Please check your email for confirmation.";

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    tag = "Auth",
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Validation failure, unreadable body, or username/email already taken")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    validate_signup(&request.username, &request.email, &request.password)?;

    // Skip hashing for a known conflict; register() re-checks under the write lock.
    state
        .credentials
        .read()
        .await
        .ensure_available(&request.username, &request.email)?;

    let hasher = state.hasher.clone();
    let password = request.password;
    let digest = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ApiError::internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            ApiError::internal("Failed to register user")
        })?;

    let identity = state
        .credentials
        .write()
        .await
        .register(&request.username, &request.email, digest)?;

    tracing::info!(user_id = %identity.id, username = %identity.username, "account registered");
    notify::dispatch(state.mailer.clone(), notify::signup_confirmation(&identity));

    Ok(Json(MessageResponse::new(SIGNUP_MESSAGE)))
}

#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = SigninRequest,
    tag = "Auth",
    responses(
        (status = 200, body = TokenResponse),
        (status = 400, description = "Unreadable request body"),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AuthError> {
    let Json(request) =
        payload.map_err(|rejection| AuthError::InvalidRequest(rejection.body_text()))?;
    let identity = state.credentials.read().await.find_by_username(&request.username);

    let hasher = state.hasher.clone();
    let digest = identity.as_ref().map(|identity| identity.password_hash().clone());
    let password = request.password;
    let verified =
        tokio::task::spawn_blocking(move || hasher.verify_credential(&password, digest.as_ref()))
            .await
            .map_err(|e| AuthError::InternalError(format!("verification task failed: {e}")))?;

    let identity = match identity {
        Some(identity) if verified => identity,
        _ => {
            tracing::debug!("signin rejected");
            return Err(AuthError::InvalidCredentials);
        }
    };

    let token = state.tokens.issue(&identity)?;
    tracing::info!(user_id = %identity.id, username = %identity.username, "signed in");

    Ok(Json(TokenResponse::bearer(token)))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn me(Auth(identity): Auth) -> Json<UserResponse> {
    Json(UserResponse::from(&identity))
}
