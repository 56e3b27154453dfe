// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        AddSpendingResponse, MessageResponse, SigninRequest, SignupRequest, SpendingResponse,
        TokenResponse, UserResponse,
    },
    state::AppState,
    storage::{Category, CategoryTotal, SpendingInput, SpendingSummary},
};

pub mod auth;
pub mod health;
pub mod spendings;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/signin", post(auth::signin))
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/spendings",
            get(spendings::list_spendings).post(spendings::add_spending),
        )
        // The web client calls the collection with a trailing slash.
        .route(
            "/api/spendings/",
            get(spendings::list_spendings).post(spendings::add_spending),
        )
        .route("/api/spendings/summary", get(spendings::spending_summary))
        .route(
            "/api/spendings/{id}",
            get(spendings::get_spending).delete(spendings::delete_spending),
        )
        .route("/health", get(health::health))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Registers the `bearer_auth` scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup,
        auth::signin,
        auth::me,
        spendings::add_spending,
        spendings::list_spendings,
        spendings::spending_summary,
        spendings::get_spending,
        spendings::delete_spending,
        health::health
    ),
    components(
        schemas(
            SignupRequest,
            SigninRequest,
            TokenResponse,
            UserResponse,
            MessageResponse,
            SpendingInput,
            SpendingResponse,
            AddSpendingResponse,
            SpendingSummary,
            CategoryTotal,
            Category,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Signup, signin and the current user"),
        (name = "Spendings", description = "Per-user spending ledger"),
        (name = "Health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;
