//! Method gating shared by every route.
//!
//! Plain `OPTIONS` requests get an empty 200. A 405 produced by the router is
//! re-rendered in the JSON error format, keeping its `Allow` header.

use crate::error::HttpAppError;
use axum::{
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hymnal_core::AppError;

pub async fn method_gate_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rendered = HttpAppError(AppError::MethodNotAllowed(format!(
        "Method {} is not allowed on {}",
        method, path
    )))
    .into_response();
    if let Some(allow) = allow {
        rendered.headers_mut().insert(header::ALLOW, allow);
    }
    rendered
}
