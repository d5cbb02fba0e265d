//! Author API endpoints
//!
//! Handles HTTP requests for authors:
//! - GET /api/authors - List authors with their books nested
//! - GET /api/authors/{id} - Author detail with books
//! - POST /api/authors - Create an author (auth)
//! - DELETE /api/authors/{id} - Delete an author and their books (auth)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{Author, AuthorWithBooks, CreateAuthorInput};
use crate::services::AuthorServiceError;

impl From<AuthorServiceError> for ApiError {
    fn from(err: AuthorServiceError) -> Self {
        match err {
            AuthorServiceError::Validation(errors) => ApiError::validation_fields(&errors),
            AuthorServiceError::NotFound(id) => {
                ApiError::not_found(format!("Author not found: {}", id))
            }
            AuthorServiceError::Internal(err) => ApiError::internal_error(err.to_string()),
        }
    }
}

/// Build the public authors router
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_authors))
        .route("/{id}", get(get_author))
}

/// Build the protected authors router (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_author))
        .route("/{id}", delete(delete_author))
}

/// GET /api/authors - List authors with books
async fn list_authors(
    State(state): State<AppState>,
) -> Result<Json<Vec<AuthorWithBooks>>, ApiError> {
    let authors = state.author_service.list_with_books().await?;
    Ok(Json(authors))
}

/// GET /api/authors/{id} - Get one author with books
async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AuthorWithBooks>, ApiError> {
    let author = state.author_service.get_with_books(id).await?;
    Ok(Json(author))
}

/// POST /api/authors - Create an author
async fn create_author(
    State(state): State<AppState>,
    Json(body): Json<CreateAuthorInput>,
) -> Result<(StatusCode, Json<Author>), ApiError> {
    let author = state.author_service.create(body).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// DELETE /api/authors/{id} - Delete an author and their books
async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.author_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
