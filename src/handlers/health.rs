//! Health check handlers

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::{constants::API_VERSION, db, state::AppState};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub api_version: &'static str,
    pub database: bool,
    pub cache: bool,
}

/// Health check endpoint; 503 when a backing service is unreachable
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = db::ping(state.db()).await.is_ok();

    let mut redis = state.redis();
    let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut redis).await;
    let cache = pong.is_ok();

    let status = if database && cache {
        StatusCode::OK
    } else {
        tracing::warn!(database, cache, "Health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: if status.is_success() { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        api_version: API_VERSION,
        database,
        cache,
    };

    (status, Json(body))
}

/// Health routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
