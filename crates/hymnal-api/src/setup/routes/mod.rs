//! Route configuration and setup.
//!
//! Domain route groups live in [domains](domains); health checks in [health](health).

mod domains;
pub(crate) mod health;

use crate::api_doc::ApiDoc;
use crate::constants::api_path;
use crate::error::HttpAppError;
use crate::middleware::{method_gate_middleware, request_id_middleware};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use hymnal_core::{AppError, Config};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let app = public_routes(state.clone())
        .merge(domains::image_routes(state.clone()))
        .merge(domains::hymn_routes(state.clone()))
        .merge(domains::content_routes(state.clone()))
        .merge(domains::media_routes(state.clone()))
        .merge(utoipa_rapidoc::RapiDoc::new(api_path("/openapi.json")).path("/docs"))
        .fallback(not_found)
        .layer(axum::middleware::from_fn(method_gate_middleware))
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes()))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn public_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(&api_path("/health"), get(health::health_check))
        .route(&api_path("/openapi.json"), get(openapi_json))
        .with_state(state)
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

async fn not_found(uri: Uri) -> HttpAppError {
    HttpAppError(AppError::NotFound(format!("No route for {}", uri.path())))
}
