use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::validation::{parse_page, parse_page_size};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use hymnal_core::models::ImagePage;
use hymnal_services::SearchRequest;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of the image name (required)
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub page_size: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/search",
    tag = "search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching images", body = ImagePage),
        (status = 400, description = "Missing search query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "search_images"))]
pub async fn search_images(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let request = SearchRequest {
        query: query.query.unwrap_or_default(),
        page: parse_page(query.page.as_deref()),
        page_size: parse_page_size(query.page_size.as_deref()),
    };

    let page = state.listing.search_images(request).await?;

    tracing::debug!(
        returned = page.images.len(),
        total = page.pagination.total,
        "Search completed"
    );

    Ok(Json(page))
}
