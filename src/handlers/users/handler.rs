//! User handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    handlers::{
        body::DeferredJson,
        pagination::{PageQuery, Paginated},
    },
    middleware::auth::{AuthenticatedUser, OptionalAuth},
    permissions,
    services::UserService,
    state::AppState,
};

use super::{
    request::{CreateUserRequest, ListUsersQuery, UpdateUserRequest},
    response::UserResponse,
};

/// List all users (admin)
pub async fn list_users(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(page): Query<PageQuery>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    permissions::admin_only(user.as_ref()).into_result()?;

    let (users, total) = UserService::list(
        state.db(),
        query.search.as_deref(),
        page.offset() as i64,
        page.limit() as i64,
    )
    .await?;

    Ok(Json(Paginated::new(users, total, &page).map(UserResponse::from)))
}

/// Create a user (admin)
pub async fn create_user(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    body: DeferredJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    permissions::admin_only(user.as_ref()).into_result()?;
    let payload = body.parse()?;
    payload.validate()?;

    let created = UserService::create(state.db(), payload.into_new_user()?).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get a user by username (admin)
pub async fn get_user(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    permissions::admin_only(user.as_ref()).into_result()?;

    let found = UserService::get_by_username(state.db(), &username).await?;
    Ok(Json(found.into()))
}

/// Update a user by username (admin)
pub async fn update_user(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(username): Path<String>,
    body: DeferredJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    permissions::admin_only(user.as_ref()).into_result()?;
    let payload = body.parse()?;
    payload.validate()?;

    let updated = UserService::update(state.db(), &username, payload.into_changes()?).await?;
    Ok(Json(updated.into()))
}

/// Delete a user by username (admin)
pub async fn delete_user(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    permissions::admin_only(user.as_ref()).into_result()?;

    UserService::delete(state.db(), &username).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current user's profile
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<UserResponse>> {
    let me = UserService::get_by_id(state.db(), &auth_user.id).await?;
    Ok(Json(me.into()))
}

/// Update the current user's profile; the role only changes for admins
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    payload.validate()?;

    let updated =
        UserService::update_me(state.db(), &auth_user, &auth_user.id, payload.into_changes()?)
            .await?;
    Ok(Json(updated.into()))
}
