use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use hymnal_core::models::DataResponse;
use std::sync::Arc;

/// The whole catalog file as stored, entries the service cannot parse included.
#[utoipa::path(
    get,
    path = "/api/getContent",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog entries wrapped as {success, data}"),
        (status = 500, description = "Catalog missing or unreadable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_content"))]
pub async fn get_content(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let document = state.catalog.load_raw().await?;
    Ok(Json(DataResponse::ok(document)))
}
