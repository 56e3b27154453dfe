// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! End-to-end tests over the full router.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Duration;
use finmate_server::{
    api::router,
    auth::{PasswordHasher, TokenService},
    config::SigningSecret,
    state::AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let tokens = TokenService::new(
        &SigningSecret::new(b"integration-secret-integration-secret".to_vec()),
        Duration::hours(1),
    );
    let hasher = PasswordHasher::with_cost(1024, 1, 1).expect("valid cost");
    router(AppState::new(tokens, hasher))
}

async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn signup(app: &Router, username: &str, email: &str, password: &str) -> (StatusCode, Value) {
    call(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({"username": username, "email": email, "password": password})),
    )
    .await
}

async fn signin(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/auth/signin",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signin failed: {body}");
    assert_eq!(body["type"], "Bearer");
    body["token"].as_str().unwrap().to_string()
}

async fn account(app: &Router, username: &str) -> String {
    let (status, _) = signup(app, username, &format!("{username}@example.com"), "pw").await;
    assert_eq!(status, StatusCode::OK);
    signin(app, username, "pw").await
}

#[tokio::test]
async fn signup_signin_add_list_delete_scenario() {
    let app = app();

    let (status, body) = signup(&app, "alice", "a@x.com", "pw").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "User registered successfully! Please check your email for confirmation."
    );

    let (status, body) = signup(&app, "alice", "other@x.com", "pw").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username is already taken");

    let alice = signin(&app, "alice", "pw").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/spendings",
        Some(&alice),
        Some(json!({"amount": "12.50", "category": "FOOD", "date": "2024-01-05", "description": "lunch"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Spending added successfully");
    let record_id = body["spending"]["id"].as_u64().unwrap();

    let (status, body) = call(&app, Method::GET, "/api/spendings", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "id": record_id,
            "amount": 12.5,
            "description": "lunch",
            "date": "2024-01-05",
            "category": "FOOD"
        }])
    );

    let bob = account(&app, "bob").await;

    let (status, body) = call(&app, Method::GET, "/api/spendings", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let uri = format!("/api/spendings/{record_id}");
    let (status, body) = call(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not authorized to delete this spending");

    let (status, body) = call(&app, Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Spending deleted successfully");

    let (status, _) = call(&app, Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = call(&app, Method::GET, "/api/spendings", Some(&alice), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app();
    let token = account(&app, "alice").await;

    let mut tampered: Vec<String> = token.split('.').map(str::to_string).collect();
    tampered[1] = URL_SAFE_NO_PAD.encode(br#"{"sub":"alice","iat":0,"exp":99999999999}"#);
    let tampered = tampered.join(".");

    for bad in [None, Some("garbage"), Some(tampered.as_str())] {
        let (status, body) = call(&app, Method::GET, "/api/spendings", bad, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authentication required");

        let (status, _) = call(&app, Method::GET, "/api/auth/me", bad, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(
            &app,
            Method::POST,
            "/api/spendings",
            bad,
            Some(json!({"amount": "1.00", "category": "FOOD", "date": "2024-01-05"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, body) = call(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
}

#[tokio::test]
async fn token_from_another_server_is_rejected() {
    let app = app();
    account(&app, "alice").await;

    let other = router(AppState::new(
        TokenService::new(
            &SigningSecret::new(b"a-completely-different-secret-value".to_vec()),
            Duration::hours(1),
        ),
        PasswordHasher::with_cost(1024, 1, 1).unwrap(),
    ));
    let foreign = account(&other, "alice").await;

    let (status, _) = call(&app, Method::GET, "/api/spendings", Some(&foreign), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signin_failures_share_one_response() {
    let app = app();
    account(&app, "alice").await;

    let wrong_password = call(
        &app,
        Method::POST,
        "/api/auth/signin",
        None,
        Some(json!({"username": "alice", "password": "nope"})),
    )
    .await;
    let unknown_user = call(
        &app,
        Method::POST,
        "/api/auth/signin",
        None,
        Some(json!({"username": "ghost", "password": "pw"})),
    )
    .await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password.1["error"], "Invalid username or password");
}

#[tokio::test]
async fn concurrent_duplicate_signups_admit_exactly_one() {
    let app = app();

    let attempts: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                signup(&app, "racer", &format!("racer{i}@example.com"), "pw").await.0
            })
        })
        .collect();

    let mut successes = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            StatusCode::OK => successes += 1,
            status => assert_eq!(status, StatusCode::BAD_REQUEST),
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn concurrent_signups_sharing_an_email_admit_exactly_one() {
    let app = app();

    let attempts: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move { signup(&app, &format!("racer{i}"), "Racer@Example.com", "pw").await })
        })
        .collect();

    let mut successes = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            (StatusCode::OK, _) => successes += 1,
            (status, body) => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body["error"], "Email is already in use");
            }
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn unreadable_auth_bodies_get_json_errors() {
    let app = app();

    for uri in ["/api/auth/signup", "/api/auth/signin"] {
        let requests = [
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"username\": "))
                .unwrap(),
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .body(Body::from(r#"{"username": "alice", "password": "pw"}"#))
                .unwrap(),
        ];

        for request in requests {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: Value = serde_json::from_slice(&bytes).expect("error body is JSON");
            assert!(body["error"].is_string(), "{uri}: {body}");
        }
    }
}

#[tokio::test]
async fn invalid_spendings_are_rejected() {
    let app = app();
    let token = account(&app, "alice").await;

    let cases = [
        json!({"amount": "-3.00", "category": "FOOD", "date": "2024-01-05"}),
        json!({"amount": "1.234", "category": "FOOD", "date": "2024-01-05"}),
        json!({"amount": "abc", "category": "FOOD", "date": "2024-01-05"}),
        json!({"amount": "79228162514264337593543950335", "category": "FOOD", "date": "2024-01-05"}),
        json!({"amount": "1.0000000000000000000000000000001", "category": "FOOD", "date": "2024-01-05"}),
        json!({"amount": "1.00", "category": "GROCERIES", "date": "2024-01-05"}),
        json!({"amount": "1.00", "category": "food", "date": "2024-01-05"}),
        json!({"amount": "1.00", "category": "FOOD", "date": "05/01/2024"}),
        json!({"category": "FOOD", "date": "2024-01-05"}),
    ];
    for case in cases {
        let (status, body) = call(&app, Method::POST, "/api/spendings", Some(&token), Some(case.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{case} should be rejected");
        assert!(body["error"].is_string());
    }

    let (_, body) = call(&app, Method::GET, "/api/spendings", Some(&token), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn trailing_slash_collection_and_summary() {
    let app = app();
    let token = account(&app, "alice").await;

    for (amount, category) in [(json!(10), "FOOD"), (json!("2.50"), "FOOD"), (json!("20.00"), "HEALTH")] {
        let (status, _) = call(
            &app,
            Method::POST,
            "/api/spendings/",
            Some(&token),
            Some(json!({"amount": amount, "category": category, "date": "2024-03-01"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call(&app, Method::GET, "/api/spendings/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["description"], "");

    let (status, body) = call(&app, Method::GET, "/api/spendings/summary", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 32.5);
    assert_eq!(body["count"], 3);
    assert_eq!(body["by_category"][0]["category"], "HEALTH");
    assert_eq!(body["by_category"][1]["category"], "FOOD");
    assert_eq!(body["by_category"][1]["total"], 12.5);
}

#[tokio::test]
async fn get_single_spending() {
    let app = app();
    let alice = account(&app, "alice").await;
    let bob = account(&app, "bob").await;

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/spendings",
        Some(&alice),
        Some(json!({"amount": 4.2, "category": "TRANSPORT", "date": "2024-02-02", "description": "bus"})),
    )
    .await;
    let uri = format!("/api/spendings/{}", body["spending"]["id"]);

    let (status, body) = call(&app, Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 4.2);
    assert_eq!(body["description"], "bus");

    let (status, _) = call(&app, Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, Method::GET, "/api/spendings/424242", Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_docs_are_public() {
    let app = app();

    let (status, body) = call(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = call(&app, Method::GET, "/api-doc/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/spendings/{id}"].is_object());
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
