//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP endpoints:
//! - Book catalog endpoints (filter/search/order)
//! - Author endpoints
//! - Library and librarian endpoints
//! - Blog post endpoints
//! - Comment endpoints
//! - Tag endpoints
//! - User/Auth endpoints
//!
//! Reads are public; writes require a session. Post and comment writes are
//! additionally restricted to their owner in the service layer.

pub mod auth;
pub mod authors;
pub mod books;
pub mod comments;
pub mod common;
pub mod libraries;
pub mod middleware;
pub mod posts;
pub mod responses;
pub mod tags;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use middleware::{ApiError, AppState, AuthenticatedUser};

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Protected routes (need auth)
    let protected_routes = Router::new()
        .nest("/auth", auth::protected_router())
        .nest("/books", books::protected_router())
        .nest("/authors", authors::protected_router())
        .nest("/libraries", libraries::protected_router())
        .nest(
            "/posts",
            posts::protected_router().merge(comments::protected_post_router()),
        )
        .nest("/comments", comments::protected_router())
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_auth,
        ));

    // Public routes
    Router::new()
        .nest("/auth", auth::public_router())
        .nest("/books", books::public_router())
        .nest("/authors", authors::public_router())
        .nest("/libraries", libraries::public_router())
        .nest(
            "/posts",
            posts::public_router().merge(comments::public_post_router()),
        )
        .nest("/tags", tags::router())
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);
    if let Ok(origin) = cors_origin.parse::<HeaderValue>() {
        cors = cors.allow_origin(origin);
    } else {
        tracing::warn!("Invalid CORS origin, requests from browsers will be refused: {}", cors_origin);
    }

    Router::new()
        .nest("/api", build_api_router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
