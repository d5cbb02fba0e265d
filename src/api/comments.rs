//! Comment API endpoints
//!
//! Handles HTTP requests for comments:
//! - GET /api/posts/{id}/comments - Comments on a post, oldest-first
//! - POST /api/posts/{id}/comments - Comment on a post (auth)
//! - PUT /api/comments/{id} - Edit a comment (auth, owner only)
//! - DELETE /api/comments/{id} - Delete a comment (auth, owner only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{Comment, CreateCommentInput};
use crate::services::CommentServiceError;

impl From<CommentServiceError> for ApiError {
    fn from(err: CommentServiceError) -> Self {
        match err {
            CommentServiceError::Validation(errors) => ApiError::validation_fields(&errors),
            CommentServiceError::NotFound(id) => {
                ApiError::not_found(format!("Comment not found: {}", id))
            }
            CommentServiceError::PostNotFound(id) => {
                ApiError::not_found(format!("Post not found: {}", id))
            }
            CommentServiceError::Forbidden { comment_id, .. } => {
                ApiError::forbidden(format!("You do not own comment {}", comment_id))
            }
            CommentServiceError::Internal(err) => ApiError::internal_error(err.to_string()),
        }
    }
}

/// Build the public comments router (nested under /posts)
pub fn public_post_router() -> Router<AppState> {
    Router::new().route("/{id}/comments", get(list_comments))
}

/// Build the protected comments routes nested under /posts
pub fn protected_post_router() -> Router<AppState> {
    Router::new().route("/{id}/comments", post(create_comment))
}

/// Build the protected comments router (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/{id}", put(update_comment).delete(delete_comment))
}

/// GET /api/posts/{id}/comments - List a post's comments
async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = state.comment_service.list_for_post(id).await?;
    Ok(Json(comments))
}

/// POST /api/posts/{id}/comments - Comment on a post
async fn create_comment(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(body): Json<CreateCommentInput>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state.comment_service.create(id, user.id, body).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// PUT /api/comments/{id} - Edit a comment (owner only)
async fn update_comment(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(body): Json<CreateCommentInput>,
) -> Result<Json<Comment>, ApiError> {
    let comment = state.comment_service.update(id, user.id, body).await?;
    Ok(Json(comment))
}

/// DELETE /api/comments/{id} - Delete a comment (owner only)
async fn delete_comment(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.comment_service.delete(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
