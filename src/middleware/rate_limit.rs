//! Rate limiting middleware
//!
//! Fixed-window counters in Redis, keyed by client IP and endpoint bucket.

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use redis::{Pipeline, RedisResult};
use std::net::SocketAddr;
use tracing::warn;

use crate::{
    constants::{rate_limits, API_BASE_PATH},
    error::AppError,
    state::AppState,
};

/// Rate limit middleware
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let bucket = path_bucket(request.uri().path());
    let (limit, window) = bucket.limits();

    let key = format!("rate_limit:{}:{}", addr.ip(), bucket.name());
    let mut redis = state.redis();

    let counted: RedisResult<(i64,)> = window_counter(&key, window)
        .query_async(&mut redis)
        .await;

    // A Redis outage must not take the API down with it
    let count = match counted {
        Ok((count,)) => count,
        Err(e) => {
            warn!(error = %e, "Rate limiter unavailable, letting request through");
            return Ok(next.run(request).await);
        }
    };

    if count > limit {
        warn!(ip = %addr.ip(), bucket = bucket.name(), count, "Rate limit exceeded");
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(request).await)
}

/// `MULTI; SET key 0 EX window NX; INCR key; EXEC`
///
/// The TTL is set in the same transaction as the increment, so a counter can
/// never outlive its window.
fn window_counter(key: &str, window: i64) -> Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .cmd("SET")
        .arg(key)
        .arg(0)
        .arg("EX")
        .arg(window)
        .arg("NX")
        .ignore()
        .incr(key, 1);
    pipe
}

/// Endpoint groups sharing one counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Auth,
    General,
}

impl Bucket {
    fn name(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::General => "general",
        }
    }

    /// (max requests, window seconds)
    fn limits(&self) -> (i64, i64) {
        match self {
            Self::Auth => (
                rate_limits::AUTH_MAX_REQUESTS,
                rate_limits::AUTH_WINDOW_SECS,
            ),
            Self::General => (
                rate_limits::GENERAL_MAX_REQUESTS,
                rate_limits::GENERAL_WINDOW_SECS,
            ),
        }
    }
}

fn path_bucket(path: &str) -> Bucket {
    let auth_prefix = format!("{}/auth", API_BASE_PATH);
    if path.starts_with(&auth_prefix) {
        Bucket::Auth
    } else {
        Bucket::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_bucket() {
        assert_eq!(path_bucket("/api/v1/auth/signup"), Bucket::Auth);
        assert_eq!(path_bucket("/api/v1/auth/token"), Bucket::Auth);
        assert_eq!(path_bucket("/api/v1/titles"), Bucket::General);
        assert_eq!(path_bucket("/health"), Bucket::General);
    }

    #[test]
    fn test_counter_expiry_is_set_with_increment() {
        let packed = window_counter("rate_limit:10.0.0.1:auth", 60).get_packed_pipeline();
        let packed = String::from_utf8(packed).unwrap();

        let position = |needle: &str| packed.find(needle).unwrap();
        assert!(position("MULTI") < position("SET"));
        assert!(position("SET") < position("INCR"));
        assert!(position("INCR") < position("EXEC"));
        assert!(packed.contains("\r\nEX\r\n"));
        assert!(packed.contains("\r\nNX\r\n"));
    }

    #[test]
    fn test_auth_bucket_is_stricter() {
        assert!(Bucket::Auth.limits().0 < Bucket::General.limits().0);
    }
}
