//! Authentication API endpoints
//!
//! Handles HTTP requests for user accounts:
//! - POST /api/auth/register - User registration
//! - POST /api/auth/login - User login (by username or email)
//! - POST /api/auth/logout - User logout (auth)
//! - GET /api/auth/me - Current user (auth)
//!
//! The session token is returned in the response body and also set as an
//! HttpOnly cookie, so both header and cookie clients work.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::api::middleware::{
    extract_session_token, ApiError, AppState, AuthenticatedUser,
};
use crate::api::responses::{AuthResponse, UserResponse};
use crate::services::{LoginInput, RegisterInput, UserServiceError};

/// Session cookie lifetime, matching the session expiration
const SESSION_COOKIE_MAX_AGE: u64 = 7 * 24 * 60 * 60;

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::AuthenticationError(_) => {
                ApiError::unauthorized("Invalid username or password")
            }
            UserServiceError::Validation(errors) => ApiError::validation_fields(&errors),
            UserServiceError::UserExists(msg) => ApiError::conflict(msg),
            UserServiceError::Internal(err) => ApiError::internal_error(err.to_string()),
        }
    }
}

/// Build public auth routes (no auth required)
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Build protected auth routes (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(get_current_user))
}

fn session_cookie(token: &str) -> Result<HeaderMap, ApiError> {
    let cookie = format!(
        "session={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        token, SESSION_COOKIE_MAX_AGE
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::internal_error(format!("Invalid cookie value: {}", e)))?,
    );
    Ok(headers)
}

/// POST /api/auth/register - Register and log the new user in
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterInput>,
) -> Result<impl IntoResponse, ApiError> {
    let password = body.password.clone();
    let user = state.user_service.register(body).await?;

    let (user, session) = state
        .user_service
        .login(LoginInput {
            username: user.username,
            password,
        })
        .await?;

    let headers = session_cookie(&session.id)?;
    Ok((
        StatusCode::CREATED,
        headers,
        Json(AuthResponse {
            user: user.into(),
            token: session.id,
        }),
    ))
}

/// POST /api/auth/login - Log in by username or email
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginInput>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, session) = state.user_service.login(body).await?;

    let headers = session_cookie(&session.id)?;
    Ok((
        headers,
        Json(AuthResponse {
            user: user.into(),
            token: session.id,
        }),
    ))
}

/// POST /api/auth/logout - Invalidate the current session
async fn logout(State(state): State<AppState>, request: Request) -> Result<StatusCode, ApiError> {
    if let Some(token) = extract_session_token(&request) {
        state.user_service.logout(&token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me - The user behind the current session
async fn get_current_user(
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Json<UserResponse> {
    Json(user.into())
}
