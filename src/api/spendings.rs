// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::{
    auth::{Session, SessionContext},
    error::ApiError,
    models::{AddSpendingResponse, MessageResponse, SpendingResponse},
    state::AppState,
    storage::{LedgerError, SpendingId, SpendingInput, SpendingSummary},
};

#[utoipa::path(
    post,
    path = "/api/spendings",
    request_body = SpendingInput,
    tag = "Spendings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = AddSpendingResponse),
        (status = 400, description = "Invalid amount, category or date"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn add_spending(
    Session(session): Session,
    State(state): State<AppState>,
    payload: Result<Json<SpendingInput>, JsonRejection>,
) -> Result<Json<AddSpendingResponse>, ApiError> {
    // Authentication is checked before the body is looked at.
    session.require().map_err(LedgerError::from)?;
    let Json(input) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let spending = state.ledger.write().await.add(&session, &input)?;
    tracing::debug!(spending_id = spending.id, "spending added");

    Ok(Json(AddSpendingResponse {
        message: "Spending added successfully".to_string(),
        spending: spending.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/spendings",
    tag = "Spendings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = [SpendingResponse]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_spendings(
    Session(session): Session,
    State(state): State<AppState>,
) -> Result<Json<Vec<SpendingResponse>>, ApiError> {
    let ledger = state.ledger.read().await;
    let spendings = ledger.list_mine(&session)?;
    Ok(Json(spendings.into_iter().map(SpendingResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/spendings/summary",
    tag = "Spendings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = SpendingSummary),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn spending_summary(
    Session(session): Session,
    State(state): State<AppState>,
) -> Result<Json<SpendingSummary>, ApiError> {
    let ledger = state.ledger.read().await;
    Ok(Json(ledger.summary_mine(&session)?))
}

#[utoipa::path(
    get,
    path = "/api/spendings/{id}",
    params(
        ("id" = u64, Path, description = "Identifier of the spending")
    ),
    tag = "Spendings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = SpendingResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Spending belongs to another user"),
        (status = 404, description = "Spending not found")
    )
)]
pub async fn get_spending(
    Session(session): Session,
    Path(id): Path<SpendingId>,
    State(state): State<AppState>,
) -> Result<Json<SpendingResponse>, ApiError> {
    let ledger = state.ledger.read().await;
    let spending = ledger.get(&session, id).inspect_err(|e| log_denial(e, &session, id))?;
    Ok(Json(spending.into()))
}

#[utoipa::path(
    delete,
    path = "/api/spendings/{id}",
    params(
        ("id" = u64, Path, description = "Identifier of the spending to delete")
    ),
    tag = "Spendings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Spending belongs to another user"),
        (status = 404, description = "Spending not found")
    )
)]
pub async fn delete_spending(
    Session(session): Session,
    Path(id): Path<SpendingId>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = state.ledger.write().await.delete(&session, id);
    match result {
        Ok(removed) => {
            tracing::debug!(spending_id = removed.id, "spending deleted");
            Ok(Json(MessageResponse::new("Spending deleted successfully")))
        }
        Err(LedgerError::NotOwner) => {
            log_denial(&LedgerError::NotOwner, &session, id);
            Err(ApiError::forbidden("Not authorized to delete this spending"))
        }
        Err(e) => Err(e.into()),
    }
}

fn log_denial(err: &LedgerError, session: &SessionContext, id: SpendingId) {
    if *err == LedgerError::NotOwner {
        let caller = session.identity().map(|identity| identity.id);
        tracing::warn!(spending_id = id, caller = ?caller, "access to foreign spending refused");
    }
}
