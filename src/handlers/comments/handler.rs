//! Comment handler implementations

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    handlers::{
        body::DeferredJson,
        pagination::{PageQuery, Paginated},
    },
    middleware::auth::OptionalAuth,
    permissions,
    services::{CommentService, ReviewService},
    state::AppState,
    utils::sanitize_string,
};

use super::{request::CommentRequest, response::CommentResponse};

/// List comments of a review
pub async fn list_comments(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<CommentResponse>>> {
    let (comments, total) = CommentService::list(
        state.db(),
        &title_id,
        &review_id,
        page.offset() as i64,
        page.limit() as i64,
    )
    .await?;

    Ok(Json(Paginated::new(comments, total, &page).map(CommentResponse::from)))
}

/// Comment on a review (authenticated)
pub async fn create_comment(
    State(state): State<AppState>,
    method: Method,
    OptionalAuth(user): OptionalAuth,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    body: DeferredJson<CommentRequest>,
) -> AppResult<(StatusCode, Json<CommentResponse>)> {
    permissions::authenticated_or_read_only(&method, user.as_ref()).into_result()?;
    let author = user.ok_or(AppError::Unauthorized)?;
    let payload = body.parse()?;
    payload.validate()?;

    let review = ReviewService::get(state.db(), &title_id, &review_id).await?;
    let comment = CommentService::create(
        state.db(),
        &review,
        &author.id,
        &sanitize_string(&payload.text),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// Get a comment
pub async fn get_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
) -> AppResult<Json<CommentResponse>> {
    let comment = CommentService::get(state.db(), &title_id, &review_id, &comment_id).await?;
    Ok(Json(comment.into()))
}

/// Update a comment (author, moderator or admin)
pub async fn update_comment(
    State(state): State<AppState>,
    method: Method,
    OptionalAuth(user): OptionalAuth,
    Path((title_id, review_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
    body: DeferredJson<CommentRequest>,
) -> AppResult<Json<CommentResponse>> {
    let comment = CommentService::get(state.db(), &title_id, &review_id, &comment_id).await?;
    permissions::owner_or_moderator_or_read_only(&method, user.as_ref(), &comment.author_id)
        .into_result()?;
    let payload = body.parse()?;
    payload.validate()?;

    let updated =
        CommentService::update(state.db(), &comment, &sanitize_string(&payload.text)).await?;
    Ok(Json(updated.into()))
}

/// Delete a comment (author, moderator or admin)
pub async fn delete_comment(
    State(state): State<AppState>,
    method: Method,
    OptionalAuth(user): OptionalAuth,
    Path((title_id, review_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    let comment = CommentService::get(state.db(), &title_id, &review_id, &comment_id).await?;
    permissions::owner_or_moderator_or_read_only(&method, user.as_ref(), &comment.author_id)
        .into_result()?;

    CommentService::delete(state.db(), &comment).await?;
    Ok(StatusCode::NO_CONTENT)
}
