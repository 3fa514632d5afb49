//! Review handler implementations

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
    services::ReviewService,
    state::AppState,
    utils::sanitize_string,
};

use super::{
    request::{CreateReviewRequest, UpdateReviewRequest},
    response::ReviewResponse,
};

/// List reviews of a title
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Paginated<ReviewResponse>>> {
    let (reviews, total) = ReviewService::list(
        state.db(),
        &title_id,
        page.offset() as i64,
        page.limit() as i64,
    )
    .await?;

    Ok(Json(Paginated::new(reviews, total, &page).map(ReviewResponse::from)))
}

/// Review a title (authenticated)
pub async fn create_review(
    State(state): State<AppState>,
    method: Method,
    OptionalAuth(user): OptionalAuth,
    Path(title_id): Path<Uuid>,
    body: DeferredJson<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<ReviewResponse>)> {
    permissions::authenticated_or_read_only(&method, user.as_ref()).into_result()?;
    let author = user.ok_or(AppError::Unauthorized)?;
    let payload = body.parse()?;
    payload.validate()?;

    let review = ReviewService::create(
        state.db(),
        &title_id,
        &author.id,
        &sanitize_string(&payload.text),
        payload.score,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(review.into())))
}

/// Get a review
pub async fn get_review(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ReviewResponse>> {
    let review = ReviewService::get(state.db(), &title_id, &review_id).await?;
    Ok(Json(review.into()))
}

/// Update a review (author, moderator or admin)
pub async fn update_review(
    State(state): State<AppState>,
    method: Method,
    OptionalAuth(user): OptionalAuth,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    body: DeferredJson<UpdateReviewRequest>,
) -> AppResult<Json<ReviewResponse>> {
    let review = ReviewService::get(state.db(), &title_id, &review_id).await?;
    permissions::owner_or_moderator_or_read_only(&method, user.as_ref(), &review.author_id)
        .into_result()?;
    let payload = body.parse()?;
    payload.validate()?;

    let text = payload.text.as_deref().map(sanitize_string);
    let updated = ReviewService::update(state.db(), &review, text.as_deref(), payload.score).await?;

    Ok(Json(updated.into()))
}

/// Delete a review (author, moderator or admin)
pub async fn delete_review(
    State(state): State<AppState>,
    method: Method,
    OptionalAuth(user): OptionalAuth,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    let review = ReviewService::get(state.db(), &title_id, &review_id).await?;
    permissions::owner_or_moderator_or_read_only(&method, user.as_ref(), &review.author_id)
        .into_result()?;

    ReviewService::delete(state.db(), &review).await?;
    Ok(StatusCode::NO_CONTENT)
}
