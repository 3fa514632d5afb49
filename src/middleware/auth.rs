//! Authentication middleware

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    db::repositories::UserRepository,
    error::AppError,
    models::{Capabilities, Role, User},
    services::AuthService,
    state::AppState,
};

/// Authenticated user resolved from a bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub is_superuser: bool,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            is_superuser: user.is_superuser,
        }
    }
}

impl Capabilities for AuthenticatedUser {
    fn role(&self) -> Role {
        self.role
    }

    fn is_superuser(&self) -> bool {
        self.is_superuser
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional authenticated user wrapper (never fails)
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}

/// Authentication middleware.
///
/// Requests without an `Authorization` header pass through anonymously.
/// A header that is present but malformed, expired, or names a user that no
/// longer exists is rejected with 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let Some(auth_header) = request
        .headers()
        .get(AUTHORIZATION)
        .map(|h| h.to_str().map(str::to_owned))
    else {
        return Ok(next.run(request).await);
    };

    let auth_header = auth_header.map_err(|_| {
        debug!(path = %path, "Auth failed: Authorization header is not valid ASCII");
        AppError::InvalidToken
    })?;

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        debug!(path = %path, "Auth failed: Invalid Authorization format (expected 'Bearer <token>')");
        return Err(AppError::InvalidToken);
    };

    let claims = AuthService::verify_token(token, &state.config().jwt.secret).map_err(|e| {
        debug!(path = %path, error = ?e, "Auth failed: Token verification failed");
        e
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        debug!(path = %path, sub = %claims.sub, error = ?e, "Auth failed: Invalid user ID in token");
        AppError::InvalidToken
    })?;

    // Role changes and deletions take effect immediately
    let user = UserRepository::find_by_id(state.db(), &user_id)
        .await?
        .ok_or_else(|| {
            debug!(path = %path, user_id = %user_id, "Auth failed: User no longer exists");
            AppError::InvalidToken
        })?;

    let user = AuthenticatedUser::from(&user);
    debug!(path = %path, user_id = %user.id, username = %user.username, role = %user.role, "User authenticated successfully");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
