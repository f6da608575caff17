//! Administrative writes. Unauthenticated and unguarded: the last writer wins.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::JsonRejection,
        State,
    },
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use hymnal_core::models::{CatalogEntry, DataResponse};
use hymnal_core::AppError;
use std::sync::Arc;

/// File part of an upload form.
struct UploadedFile {
    name: String,
    content_type: String,
    data: Bytes,
}

#[utoipa::path(
    post,
    path = "/api/images/upload",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored as {success, url, filename}"),
        (status = 400, description = "No image field or empty file", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut multipart = multipart?;
    let mut file: Option<UploadedFile> = None;
    let mut dir: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "image" => {
                if file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Send exactly one field named 'image'".to_string(),
                    )
                    .into());
                }
                let name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await?;
                file = Some(UploadedFile {
                    name,
                    content_type,
                    data,
                });
            }
            "dir" => {
                let value = field.text().await?;
                dir = Some(value.trim().to_string()).filter(|d| !d.is_empty());
            }
            _ => {}
        }
    }

    let file =
        file.ok_or_else(|| AppError::InvalidInput("No image file uploaded".to_string()))?;

    let uploaded = state
        .upload
        .upload_image(&file.name, file.data, &file.content_type, dir.as_deref())
        .await?;

    tracing::info!(key = %uploaded.filename, "Image uploaded");

    Ok(Json(uploaded))
}

#[utoipa::path(
    post,
    path = "/api/hymn",
    tag = "hymns",
    request_body(content = inline(Object), content_type = "application/json"),
    responses(
        (status = 200, description = "Entry appended as {success, data}"),
        (status = 400, description = "Invalid entry", body = ErrorResponse),
        (status = 500, description = "Catalog could not be written", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, payload), fields(operation = "add_hymn"))]
pub async fn add_hymn(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CatalogEntry>, JsonRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Json(entry) = payload?;
    let entry = state.upload.add_hymn(entry).await?;

    tracing::info!(hymn_id = %entry.id, filename = %entry.filename, "Hymn added to catalog");

    Ok(Json(DataResponse::ok(entry)))
}
