//! V1 API route definitions.

use axum::{
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::api::v1::categories::{all_categories, get_category};
use crate::api::v1::languages::{all_languages, get_language};
use crate::api::v1::speakers::{all_speakers, get_speaker};
use crate::api::v1::tags::{all_tags, get_tag};
use crate::api::v1::videos::{all_videos, create_video, get_video};
use crate::InnerState;

/// Creates the V1 API routes.
///
/// Resource paths keep their trailing slash; it is part of the
/// canonical URI and of the `Location` headers handed back on create.
pub fn create_v1_routes(state: InnerState) -> Router<InnerState> {
    Router::new()
        .route("/", get(api_index))
        // Video resource
        .route("/video/", get(all_videos).post(create_video))
        .route("/video/{video_id}/", get(get_video))
        // Speaker resource
        .route("/speaker/", get(all_speakers))
        .route("/speaker/{speaker_id}/", get(get_speaker))
        // Category resource
        .route("/category/", get(all_categories))
        .route("/category/{category_id}/", get(get_category))
        // Tag resource
        .route("/tag/", get(all_tags))
        .route("/tag/{tag_id}/", get(get_tag))
        // Language resource
        .route("/language/", get(all_languages))
        .route("/language/{language_id}/", get(get_language))
        .with_state(state)
}

/// Top-level index mapping each resource to its list endpoint.
async fn api_index() -> Json<Value> {
    Json(json!({
        "video": { "list_endpoint": "/api/v1/video/" },
        "speaker": { "list_endpoint": "/api/v1/speaker/" },
        "category": { "list_endpoint": "/api/v1/category/" },
        "tag": { "list_endpoint": "/api/v1/tag/" },
        "language": { "list_endpoint": "/api/v1/language/" },
    }))
}
