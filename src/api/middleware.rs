//! API middleware
//!
//! Contains the shared application state, the JSON error envelope used by
//! every endpoint, and the authentication middleware that resolves session
//! tokens to users.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::db::repositories::{
    SqlxAuthorRepository, SqlxBookRepository, SqlxCommentRepository, SqlxLibraryRepository,
    SqlxPostRepository, SqlxSessionRepository, SqlxTagRepository, SqlxUserRepository,
};
use crate::models::User;
use crate::services::{
    AuthorService, BookService, CommentService, FieldErrors, LibraryService, PostService,
    TagService, UserService,
};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub user_service: Arc<UserService>,
    pub book_service: Arc<BookService>,
    pub author_service: Arc<AuthorService>,
    pub library_service: Arc<LibraryService>,
    pub post_service: Arc<PostService>,
    pub comment_service: Arc<CommentService>,
    pub tag_service: Arc<TagService>,
}

impl AppState {
    /// Wire all repositories and services onto one pool.
    pub fn build(pool: SqlitePool) -> Self {
        let user_repo = SqlxUserRepository::boxed(pool.clone());
        let session_repo = SqlxSessionRepository::boxed(pool.clone());
        let author_repo = SqlxAuthorRepository::boxed(pool.clone());
        let book_repo = SqlxBookRepository::boxed(pool.clone());
        let library_repo = SqlxLibraryRepository::boxed(pool.clone());
        let post_repo = SqlxPostRepository::boxed(pool.clone());
        let comment_repo = SqlxCommentRepository::boxed(pool.clone());
        let tag_repo = SqlxTagRepository::boxed(pool.clone());

        let tag_service = Arc::new(TagService::new(tag_repo, post_repo.clone()));

        Self {
            pool,
            user_service: Arc::new(UserService::new(user_repo, session_repo)),
            book_service: Arc::new(BookService::new(book_repo.clone(), author_repo.clone())),
            author_service: Arc::new(AuthorService::new(author_repo, book_repo.clone())),
            library_service: Arc::new(LibraryService::new(library_repo, book_repo)),
            post_service: Arc::new(PostService::new(post_repo.clone(), tag_service.clone())),
            comment_service: Arc::new(CommentService::new(comment_repo, post_repo)),
            tag_service,
        }
    }
}

/// Authenticated user extracted from request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Validation failure carrying the per-field messages in `details`.
    pub fn validation_fields(errors: &FieldErrors) -> Self {
        Self::with_details("VALIDATION_ERROR", errors.to_string(), errors.to_json())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "FORBIDDEN" => StatusCode::FORBIDDEN,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error: {}", self.error.message);
        }

        (status, Json(self)).into_response()
    }
}

/// Extract session token from request
pub fn extract_session_token(request: &Request) -> Option<String> {
    if let Some(auth_header) = request.headers().get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    if let Some(cookie_header) = request.headers().get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                let cookie = cookie.trim();
                if let Some(token) = cookie.strip_prefix("session=") {
                    return Some(token.to_string());
                }
            }
        }
    }

    None
}

/// Authentication middleware
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(&request)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    let user = state
        .user_service
        .validate_session(&token)
        .await
        .map_err(|e| ApiError::internal_error(format!("Session validation failed: {}", e)))?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(header_name: header::HeaderName, value: &str) -> Request {
        Request::builder()
            .header(header_name, value)
            .body(Body::empty())
            .expect("Failed to build request")
    }

    #[test]
    fn test_extracts_bearer_token() {
        let request = request_with(header::AUTHORIZATION, "Bearer abc123");
        assert_eq!(extract_session_token(&request), Some("abc123".to_string()));
    }

    #[test]
    fn test_extracts_session_cookie() {
        let request = request_with(header::COOKIE, "theme=dark; session=xyz789");
        assert_eq!(extract_session_token(&request), Some("xyz789".to_string()));
    }

    #[test]
    fn test_no_token_returns_none() {
        let request = Request::builder().body(Body::empty()).unwrap();
        assert!(extract_session_token(&request).is_none());
    }

    #[test]
    fn test_validation_error_maps_to_400() {
        let response = ApiError::validation_error("bad input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::unauthorized("no token").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ApiError::forbidden("not yours").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = ApiError::internal_error("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
