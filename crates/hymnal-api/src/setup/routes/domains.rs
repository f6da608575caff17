//! Domain route groups (images, hymns, catalog content, media).

use crate::constants::api_path;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn image_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(&api_path("/images"), get(handlers::images::list_images))
        .route(&api_path("/images/search"), get(handlers::search::search_images))
        .route(&api_path("/images/upload"), post(handlers::upload::upload_image))
        .route(&api_path("/search"), get(handlers::search::search_images))
        .with_state(state)
}

pub fn hymn_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &api_path("/hymn/detail"),
            get(handlers::hymn_detail::get_hymn_detail_by_query),
        )
        .route(
            &api_path("/hymn/detail/"),
            get(handlers::hymn_detail::get_hymn_detail_by_query),
        )
        .route(
            &api_path("/hymn/detail/{id}"),
            get(handlers::hymn_detail::get_hymn_detail),
        )
        .route(&api_path("/hymn"), post(handlers::upload::add_hymn))
        .with_state(state)
}

pub fn content_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(&api_path("/getContent"), get(handlers::content::get_content))
        .route(&api_path("/activityList"), get(handlers::activity::activity_list))
        .route(
            &api_path("/meetingData/topicListApi"),
            get(handlers::activity::topic_list),
        )
        .route(
            &api_path("/meetingData/topicDetailApi"),
            get(handlers::activity::topic_detail),
        )
        .with_state(state)
}

pub fn media_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(&api_path("/drama/video"), get(handlers::drama::get_drama_video))
        .with_state(state)
}
