//! Health check handler.

use crate::constants::api_path;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use hymnal_core::models::{ApiEndpoint, ComponentHealth, EnvironmentInfo, HealthResponse};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Probed key; it only needs to be syntactically valid.
const PROBE_KEY: &str = "health-check-non-existent-key";

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

fn endpoint(method: &str, path: &str, description: &str) -> ApiEndpoint {
    ApiEndpoint {
        method: method.to_string(),
        path: api_path(path),
        description: description.to_string(),
    }
}

fn endpoint_inventory() -> Vec<ApiEndpoint> {
    vec![
        endpoint("GET", "/images", "Paginated image listing"),
        endpoint("GET", "/search", "Image search by name"),
        endpoint("GET", "/getContent", "Raw catalog"),
        endpoint("GET", "/hymn/detail/{id}", "Hymn detail with resolved media"),
        endpoint("GET", "/activityList", "Activity list"),
        endpoint("GET", "/meetingData/topicListApi", "Meeting topic list"),
        endpoint("GET", "/meetingData/topicDetailApi", "Meeting topic detail"),
        endpoint("GET", "/drama/video", "Drama episode URL"),
        endpoint("GET", "/health", "Service health"),
    ]
}

/// Environment, catalog presence and a bounded storage probe.
///
/// Always answers 200; a degraded dependency only changes `status`.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service status", body = HealthResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "health_check"))]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = &state.config;

    let catalog = if state.catalog.is_available().await {
        ComponentHealth {
            status: "healthy".to_string(),
            detail: None,
        }
    } else {
        ComponentHealth {
            status: "missing".to_string(),
            detail: Some("No catalog file found".to_string()),
        }
    };

    let storage = match state.storage.clone() {
        Some(storage) => {
            let status = run_check(
                config.probe_timeout(),
                async move { storage.exists(PROBE_KEY).await.map(drop) },
                "unhealthy",
            )
            .await;
            ComponentHealth {
                status,
                detail: Some(config.storage_backend().to_string()),
            }
        }
        None => ComponentHealth {
            status: "unconfigured".to_string(),
            detail: Some("Listings are served from the catalog".to_string()),
        },
    };

    let storage_ok = storage.status == "healthy" || storage.status == "unconfigured";
    let overall = if catalog.status == "healthy" && storage_ok {
        "healthy"
    } else {
        tracing::warn!(
            catalog = %catalog.status,
            storage = %storage.status,
            "Health check degraded"
        );
        "degraded"
    };

    Json(HealthResponse {
        status: overall.to_string(),
        timestamp: chrono::Utc::now(),
        message: "Hymnal API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        apis: endpoint_inventory(),
        environment: EnvironmentInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            platform: std::env::consts::OS.to_string(),
            production: config.is_production(),
            oss_configured: config.oss_configured(),
            storage_backend: config.storage_backend().to_string(),
        },
        catalog,
        storage,
    })
}
