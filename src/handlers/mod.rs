//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod auth;
pub mod body;
pub mod comments;
pub mod health;
pub mod pagination;
pub mod reviews;
pub mod taxonomy;
pub mod titles;
pub mod users;

use axum::{middleware, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::{
    constants::{API_BASE_PATH, MAX_REQUEST_BODY_BYTES},
    middleware::{auth_middleware, logging_middleware, rate_limit_middleware},
    models::Taxonomy,
    state::AppState,
};

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/auth", auth::routes())
        .nest("/users", users::routes())
        .nest("/categories", taxonomy::routes(Taxonomy::Category))
        .nest("/genres", taxonomy::routes(Taxonomy::Genre))
        .nest("/titles", titles::routes())
        .nest("/titles/{title_id}/reviews", reviews::routes())
        .nest(
            "/titles/{title_id}/reviews/{review_id}/comments",
            comments::routes(),
        )
}

/// Full application router with middleware
///
/// The rate limiter needs the peer address: serve with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest(API_BASE_PATH, routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
