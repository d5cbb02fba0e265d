//! Post API endpoints
//!
//! Handles HTTP requests for blog posts:
//! - GET /api/posts - Paginated listing, newest-first, optional `q` search
//! - GET /api/posts/{id} - Post detail with tags
//! - POST /api/posts - Publish a post (auth)
//! - PUT /api/posts/{id} - Update a post (auth, owner only)
//! - DELETE /api/posts/{id} - Delete a post (auth, owner only)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::api::common::PaginationQuery;
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::api::responses::{PostListResponse, PostResponse};
use crate::models::{CreatePostInput, UpdatePostInput};
use crate::services::PostServiceError;

impl From<PostServiceError> for ApiError {
    fn from(err: PostServiceError) -> Self {
        match err {
            PostServiceError::Validation(errors) => ApiError::validation_fields(&errors),
            PostServiceError::NotFound(id) => {
                ApiError::not_found(format!("Post not found: {}", id))
            }
            PostServiceError::Forbidden { post_id, .. } => {
                ApiError::forbidden(format!("You do not own post {}", post_id))
            }
            PostServiceError::Internal(err) => ApiError::internal_error(err.to_string()),
        }
    }
}

/// Build the public posts router
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts))
        .route("/{id}", get(get_post))
}

/// Build the protected posts router (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_post))
        .route("/{id}", axum::routing::put(update_post).delete(delete_post))
}

/// GET /api/posts - Paginated post listing
async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<PostListResponse>, ApiError> {
    let page = state
        .post_service
        .list(query.page, query.page_size, query.q.as_deref())
        .await?;
    Ok(Json(PostListResponse::new(
        page.posts,
        page.total,
        page.page,
        page.page_size,
    )))
}

/// GET /api/posts/{id} - Post detail with tags
async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PostResponse>, ApiError> {
    let (post, tags) = state.post_service.get(id).await?;
    Ok(Json(PostResponse::from(post).with_tags(tags)))
}

/// POST /api/posts - Publish a post owned by the session user
async fn create_post(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Json(body): Json<CreatePostInput>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let (post, tags) = state.post_service.create(user.id, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(PostResponse::from(post).with_tags(tags)),
    ))
}

/// PUT /api/posts/{id} - Update a post (owner only)
async fn update_post(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePostInput>,
) -> Result<Json<PostResponse>, ApiError> {
    let (post, tags) = state.post_service.update(id, user.id, body).await?;
    Ok(Json(PostResponse::from(post).with_tags(tags)))
}

/// DELETE /api/posts/{id} - Delete a post (owner only)
async fn delete_post(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.post_service.delete(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
