use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::validation::non_blank;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use hymnal_core::models::DataResponse;
use hymnal_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DramaQuery {
    /// Episode basename, with or without extension
    #[serde(default)]
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/drama/video",
    tag = "media",
    params(DramaQuery),
    responses(
        (status = 200, description = "Playable URL for the episode, signed when possible"),
        (status = 400, description = "Missing name", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "drama_video"))]
pub async fn get_drama_video(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DramaQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = non_blank(query.name)
        .ok_or_else(|| AppError::InvalidInput("Video name is required".to_string()))?;

    let video = state.media.drama_video(&name).await;
    if !video.verified {
        tracing::warn!(name = %name, key = %video.key, "Drama video not found, returning assumed key");
    }

    Ok(Json(DataResponse::ok(video)))
}
