//! Tag API endpoints
//!
//! Handles HTTP requests for tags:
//! - GET /api/tags - All tags, ordered by name
//! - GET /api/tags/{name} - One tag with the posts carrying it

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::TagDetailResponse;
use crate::models::Tag;
use crate::services::TagServiceError;

impl From<TagServiceError> for ApiError {
    fn from(err: TagServiceError) -> Self {
        match err {
            TagServiceError::Validation(errors) => ApiError::validation_fields(&errors),
            TagServiceError::NotFound(name) => {
                ApiError::not_found(format!("Tag not found: {}", name))
            }
            TagServiceError::Internal(err) => ApiError::internal_error(err.to_string()),
        }
    }
}

/// Build the tags router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags))
        .route("/{name}", get(get_tag))
}

/// GET /api/tags - List all tags
async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    let tags = state.tag_service.list().await?;
    Ok(Json(tags))
}

/// GET /api/tags/{name} - One tag with its posts, newest-first
async fn get_tag(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TagDetailResponse>, ApiError> {
    let (tag, posts) = state.tag_service.get_with_posts(&name).await?;
    Ok(Json(TagDetailResponse::new(tag, posts)))
}
