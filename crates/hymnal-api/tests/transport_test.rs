//! Cross-cutting HTTP behavior: CORS, method gating, request ids, fallbacks, health.
//!
//! Run with: `cargo test -p hymnal-api --test transport_test`

mod helpers;

use axum::http::Method;
use helpers::fixtures::grace_catalog;
use helpers::storage::seeded_storage;
use helpers::{api_path, setup_app_without_catalog, setup_test_app};
use serde_json::Value;

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = setup_test_app(grace_catalog(), None).await;

    let response = app
        .client()
        .get(&api_path("/getContent"))
        .add_header("Origin", "https://hymns.example.org")
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_options_is_empty_200() {
    let app = setup_test_app(grace_catalog(), None).await;

    for path in ["/images", "/hymn/detail/grace", "/not-a-route"] {
        let response = app
            .client()
            .method(Method::OPTIONS, &api_path(path))
            .await;
        assert_eq!(response.status_code(), 200, "OPTIONS {}", path);
        assert!(response.as_bytes().is_empty(), "OPTIONS {}", path);
    }

    let response = app
        .client()
        .method(Method::OPTIONS, &api_path("/images"))
        .add_header("Origin", "https://hymns.example.org")
        .add_header("Access-Control-Request-Method", "GET")
        .await;
    assert_eq!(response.status_code(), 200);
    assert!(response
        .headers()
        .get("access-control-allow-methods")
        .is_some());
}

#[tokio::test]
async fn test_unsupported_methods_are_json_405() {
    let app = setup_test_app(grace_catalog(), None).await;

    let response = app.client().delete(&api_path("/images")).await;
    assert_eq!(response.status_code(), 405);
    let body: Value = response.json();
    assert_eq!(body["code"], "METHOD_NOT_ALLOWED");
    assert!(response.headers().get("allow").is_some());

    let response = app.client().put(&api_path("/hymn/detail/grace")).await;
    assert_eq!(response.status_code(), 405);
    let body: Value = response.json();
    assert_eq!(body["code"], "METHOD_NOT_ALLOWED");

    let response = app.client().post(&api_path("/getContent")).await;
    assert_eq!(response.status_code(), 405);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = setup_test_app(grace_catalog(), None).await;

    let response = app.client().get(&api_path("/hymns/everything")).await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["error"], "No route for /api/hymns/everything");
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let app = setup_test_app(grace_catalog(), None).await;

    let response = app
        .client()
        .get(&api_path("/health"))
        .add_header("X-Request-ID", "req-123")
        .await;
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-123")
    );

    let response = app.client().get(&api_path("/hymns/everything")).await;
    let generated = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(uuid::Uuid::parse_str(&generated).is_ok());
}

#[tokio::test]
async fn test_health_without_storage() {
    let app = setup_test_app(grace_catalog(), None).await;

    let response = app.client().get(&api_path("/health")).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["catalog"]["status"], "healthy");
    assert_eq!(body["storage"]["status"], "unconfigured");
    assert_eq!(body["environment"]["storageBackend"], "memory");
    assert_eq!(body["environment"]["production"], false);
    assert!(body["apis"]
        .as_array()
        .unwrap()
        .iter()
        .any(|api| api["path"] == "/api/hymn/detail/{id}"));
}

#[tokio::test]
async fn test_health_with_storage_probe() {
    let app = setup_test_app(grace_catalog(), Some(seeded_storage(&[]).await)).await;

    let response = app.client().get(&api_path("/health")).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"]["status"], "healthy");
}

#[tokio::test]
async fn test_health_is_degraded_without_catalog() {
    let app = setup_app_without_catalog(None).await;

    let response = app.client().get(&api_path("/health")).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["catalog"]["status"], "missing");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app(grace_catalog(), None).await;

    let response = app.client().get(&api_path("/openapi.json")).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["paths"].get("/api/images").is_some());
    assert!(body["paths"].get("/api/drama/video").is_some());
}
