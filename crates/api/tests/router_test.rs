//! Router tests for requests that are answered before any query runs.
//!
//! The database handle is disconnected, so any route that reached the
//! database would fail with a 500.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use hogar_api::{AppState, create_router};
use hogar_shared::{JwtConfig, JwtService};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

fn state() -> AppState {
    AppState {
        db: Arc::new(DatabaseConnection::Disconnected),
        jwt_service: Arc::new(JwtService::new(JwtConfig {
            secret: "router-test-secret".into(),
            ..JwtConfig::default()
        })),
        storage: None,
    }
}

async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = create_router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_answers_without_database() {
    let (status, body) = send(state(), get("/api/v1/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "unreachable");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let (status, body) = send(state(), get("/api/v1/auth/me", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let (status, _) = send(state(), get("/api/v1/auth/me", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let other = JwtService::new(JwtConfig {
        secret: "another-secret".into(),
        ..JwtConfig::default()
    });
    let pair = other.issue_pair(Uuid::now_v7(), None).unwrap();

    let (status, _) = send(state(), get("/api/v1/auth/me", Some(&pair.access_token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let state = state();
    let pair = state
        .jwt_service
        .issue_pair(Uuid::now_v7(), Some((Uuid::now_v7(), "owner")))
        .unwrap();

    let (status, _) = send(state, get("/api/v1/auth/me", Some(&pair.refresh_token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_access_token_cannot_refresh() {
    let state = state();
    let pair = state.jwt_service.issue_pair(Uuid::now_v7(), None).unwrap();

    let request = post_json(
        "/api/v1/auth/refresh",
        &serde_json::json!({ "refresh_token": pair.access_token }),
    );
    let (status, _) = send(state, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validates_before_touching_database() {
    let request = post_json(
        "/api/v1/auth/register",
        &serde_json::json!({
            "email": "not-an-email",
            "password": "correct horse battery",
            "display_name": "Ana"
        }),
    );
    let (status, body) = send(state(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_family_route_rejects_malformed_family_id() {
    let state = state();
    let pair = state.jwt_service.issue_pair(Uuid::now_v7(), None).unwrap();

    let (status, _) = send(
        state,
        get("/api/v1/families/not-a-uuid/expenses", Some(&pair.access_token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, _) = send(state(), get("/api/v1/nope", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
