//! OpenAPI documentation, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::setup::routes::health;
use hymnal_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hymnal API",
        version = "0.1.0",
        description = "Hymn catalog service: paginated image listing and search over object storage with a catalog fallback, hymn detail resolution with audio and video URLs, activity and meeting documents. All endpoints are under /api/."
    ),
    paths(
        // Images
        handlers::images::list_images,
        handlers::search::search_images,
        handlers::upload::upload_image,
        // Hymns
        handlers::hymn_detail::get_hymn_detail,
        handlers::hymn_detail::get_hymn_detail_by_query,
        handlers::upload::add_hymn,
        // Catalog and documents
        handlers::content::get_content,
        handlers::activity::activity_list,
        handlers::activity::topic_list,
        handlers::activity::topic_detail,
        // Media
        handlers::drama::get_drama_video,
        // Health
        health::health_check,
    ),
    components(
        schemas(
            error::ErrorResponse,
            models::ImageItem,
            models::PaginationDescriptor,
            models::ImagePage,
            models::HealthResponse,
            models::ApiEndpoint,
            models::EnvironmentInfo,
            models::ComponentHealth,
        )
    ),
    tags(
        (name = "images", description = "Image listing, search and upload"),
        (name = "search", description = "Image search"),
        (name = "hymns", description = "Hymn detail and catalog writes"),
        (name = "catalog", description = "Raw catalog content"),
        (name = "activities", description = "Activity and meeting documents"),
        (name = "media", description = "Audio and video URL resolution"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;
