//! Activity and meeting-topic documents.

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

#[utoipa::path(
    get,
    path = "/api/activityList",
    tag = "activities",
    responses(
        (status = 200, description = "Activity list document as stored"),
        (status = 500, description = "Document missing or unreadable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "activity_list"))]
pub async fn activity_list(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(state.documents.activity_list().await?))
}

#[utoipa::path(
    get,
    path = "/api/meetingData/topicListApi",
    tag = "activities",
    responses(
        (status = 200, description = "Meeting topic list document as stored"),
        (status = 500, description = "Document missing or unreadable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "topic_list"))]
pub async fn topic_list(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(state.documents.topic_list().await?))
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopicDetailQuery {
    #[serde(default)]
    pub id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/meetingData/topicDetailApi",
    tag = "activities",
    params(TopicDetailQuery),
    responses(
        (status = 200, description = "One topic as {success, data}"),
        (status = 400, description = "Missing id", body = ErrorResponse),
        (status = 404, description = "Topic not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "topic_detail"))]
pub async fn topic_detail(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopicDetailQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = non_blank(query.id)
        .ok_or_else(|| AppError::InvalidInput("Topic ID is required".to_string()))?;

    let topic = state
        .documents
        .topic_detail(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Topic not found: {}", id)))?;

    Ok(Json(DataResponse::ok(topic)))
}
