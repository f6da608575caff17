use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::validation::parse_flag;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DetailQuery {
    /// Catalog id, when not given in the path
    #[serde(default)]
    pub id: Option<String>,
    /// Skip object existence checks (`true`, `1` or `yes`)
    #[serde(default)]
    pub fast: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/hymn/detail/{id}",
    tag = "hymns",
    params(
        ("id" = String, Path, description = "Catalog id"),
        ("fast" = Option<String>, Query, description = "Skip object existence checks")
    ),
    responses(
        (status = 200, description = "Resolved hymn detail as {success, data, fast_mode}"),
        (status = 400, description = "Missing id", body = ErrorResponse),
        (status = 404, description = "Hymn not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(hymn_id = %id, operation = "hymn_detail"))]
pub async fn get_hymn_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let fast = parse_flag(query.fast.as_deref());
    let response = state.detail.get_detail(&id, fast).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/hymn/detail",
    tag = "hymns",
    params(DetailQuery),
    responses(
        (status = 200, description = "Resolved hymn detail as {success, data, fast_mode}"),
        (status = 400, description = "Missing id", body = ErrorResponse),
        (status = 404, description = "Hymn not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "hymn_detail"))]
pub async fn get_hymn_detail_by_query(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DetailQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let fast = parse_flag(query.fast.as_deref());
    let id = query.id.unwrap_or_default();
    let response = state.detail.get_detail(&id, fast).await?;
    Ok(Json(response))
}
