//! Book API endpoints
//!
//! Handles HTTP requests for the book catalog:
//! - GET /api/books/list - Filtered, searched, ordered listing
//! - GET /api/books/{id} - Book detail
//! - POST /api/books/create - Create a book (auth)
//! - PUT/PATCH /api/books/{id}/update - Update a book (auth)
//! - DELETE /api/books/{id}/delete - Delete a book (auth)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{Book, BookListParams, CreateBookInput, UpdateBookInput};
use crate::services::BookServiceError;

impl From<BookServiceError> for ApiError {
    fn from(err: BookServiceError) -> Self {
        match err {
            BookServiceError::Validation(errors) => ApiError::validation_fields(&errors),
            BookServiceError::NotFound(id) => {
                ApiError::not_found(format!("Book not found: {}", id))
            }
            BookServiceError::Internal(err) => ApiError::internal_error(err.to_string()),
        }
    }
}

/// Build the public books router
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_books))
        .route("/{id}", get(get_book))
}

/// Build the protected books router (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_book))
        .route("/{id}/update", put(update_book).patch(update_book))
        .route("/{id}/delete", delete(delete_book))
}

/// GET /api/books/list - List books
///
/// All filters combine with AND; `search` matches title or author name;
/// `ordering` accepts `title` or `publication_year`, with a leading `-`
/// for descending.
async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<BookListParams>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books = state.book_service.list(&params).await?;
    Ok(Json(books))
}

/// GET /api/books/{id} - Get a single book
async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, ApiError> {
    let book = state.book_service.get(id).await?;
    Ok(Json(book))
}

/// POST /api/books/create - Create a book
async fn create_book(
    State(state): State<AppState>,
    Json(body): Json<CreateBookInput>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let book = state.book_service.create(body).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// PUT/PATCH /api/books/{id}/update - Update a book
async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateBookInput>,
) -> Result<Json<Book>, ApiError> {
    let book = state.book_service.update(id, body).await?;
    Ok(Json(book))
}

/// DELETE /api/books/{id}/delete - Delete a book
async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.book_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
