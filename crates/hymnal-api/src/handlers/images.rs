use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::validation::{non_blank, parse_page, parse_page_size};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use hymnal_core::models::ImagePage;
use hymnal_services::ListRequest;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Paging values are kept as text so malformed numbers fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListImagesQuery {
    /// 1-based page number (default 1)
    #[serde(default)]
    pub page: Option<String>,
    /// Items per page (default 20, max 1000)
    #[serde(default)]
    pub page_size: Option<String>,
    /// Continuation marker from a previous page
    #[serde(default)]
    pub marker: Option<String>,
    /// Logical folder (default the image folder)
    #[serde(default)]
    pub dir: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/images",
    tag = "images",
    params(ListImagesQuery),
    responses(
        (status = 200, description = "One page of images", body = ImagePage),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_images"))]
pub async fn list_images(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListImagesQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let request = ListRequest {
        page: parse_page(query.page.as_deref()),
        page_size: parse_page_size(query.page_size.as_deref()),
        marker: non_blank(query.marker),
        dir: non_blank(query.dir),
    };

    let page = state.listing.list_images(request).await?;

    tracing::debug!(
        returned = page.images.len(),
        total = page.pagination.total,
        has_more = page.pagination.has_more,
        "Listed images"
    );

    Ok(Json(page))
}
