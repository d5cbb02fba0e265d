//! Library API endpoints
//!
//! Handles HTTP requests for libraries and their shelves:
//! - GET /api/libraries - List libraries
//! - GET /api/libraries/{id} - Library detail with shelved books
//! - GET /api/libraries/{id}/librarian - The library's librarian
//! - POST /api/libraries - Create a library (auth)
//! - POST /api/libraries/{id}/books/{book_id} - Shelve a book (auth)
//! - DELETE /api/libraries/{id}/books/{book_id} - Unshelve a book (auth)
//! - POST /api/libraries/{id}/librarian - Assign a librarian (auth)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::LibraryDetailResponse;
use crate::models::{CreateLibrarianInput, CreateLibraryInput, Librarian, Library};
use crate::services::LibraryServiceError;

impl From<LibraryServiceError> for ApiError {
    fn from(err: LibraryServiceError) -> Self {
        match err {
            LibraryServiceError::Validation(errors) => ApiError::validation_fields(&errors),
            LibraryServiceError::LibraryNotFound(id) => {
                ApiError::not_found(format!("Library not found: {}", id))
            }
            LibraryServiceError::BookNotFound(id) => {
                ApiError::not_found(format!("Book not found: {}", id))
            }
            LibraryServiceError::NoLibrarian(id) => {
                ApiError::not_found(format!("Library {} has no librarian", id))
            }
            LibraryServiceError::Internal(err) => ApiError::internal_error(err.to_string()),
        }
    }
}

/// Build the public libraries router
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_libraries))
        .route("/{id}", get(get_library))
        .route("/{id}/librarian", get(get_librarian))
}

/// Build the protected libraries router (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_library))
        .route("/{id}/books/{book_id}", post(shelve_book).delete(unshelve_book))
        .route("/{id}/librarian", post(assign_librarian))
}

/// GET /api/libraries - List libraries
async fn list_libraries(State(state): State<AppState>) -> Result<Json<Vec<Library>>, ApiError> {
    let libraries = state.library_service.list().await?;
    Ok(Json(libraries))
}

/// GET /api/libraries/{id} - Library with its shelved books
async fn get_library(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LibraryDetailResponse>, ApiError> {
    let (library, books) = state.library_service.get_with_books(id).await?;
    Ok(Json(LibraryDetailResponse::new(library, books)))
}

/// GET /api/libraries/{id}/librarian - The librarian staffing a library
async fn get_librarian(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Librarian>, ApiError> {
    let librarian = state.library_service.librarian(id).await?;
    Ok(Json(librarian))
}

/// POST /api/libraries - Create a library
async fn create_library(
    State(state): State<AppState>,
    Json(body): Json<CreateLibraryInput>,
) -> Result<(StatusCode, Json<Library>), ApiError> {
    let library = state.library_service.create(body).await?;
    Ok((StatusCode::CREATED, Json(library)))
}

/// POST /api/libraries/{id}/books/{book_id} - Shelve a book
async fn shelve_book(
    State(state): State<AppState>,
    Path((id, book_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state.library_service.add_book(id, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/libraries/{id}/books/{book_id} - Unshelve a book
async fn unshelve_book(
    State(state): State<AppState>,
    Path((id, book_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state.library_service.remove_book(id, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/libraries/{id}/librarian - Assign a librarian
async fn assign_librarian(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CreateLibrarianInput>,
) -> Result<(StatusCode, Json<Librarian>), ApiError> {
    let librarian = state.library_service.assign_librarian(id, body).await?;
    Ok((StatusCode::CREATED, Json(librarian)))
}
