//! Title handler implementations

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    handlers::{
        body::DeferredJson,
        pagination::{PageQuery, Paginated},
    },
    middleware::auth::OptionalAuth,
    models::TitleFilter,
    permissions,
    services::TitleService,
    state::AppState,
    utils::sanitize_string,
};

use super::{
    request::{CreateTitleRequest, UpdateTitleRequest},
    response::TitleResponse,
};

/// List titles, filtered by genre, category, year and name
pub async fn list_titles(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<TitleFilter>,
) -> AppResult<Json<Paginated<TitleResponse>>> {
    let (titles, total) = TitleService::list(
        state.db(),
        &filter,
        page.offset() as i64,
        page.limit() as i64,
    )
    .await?;

    Ok(Json(Paginated::new(titles, total, &page).map(TitleResponse::from)))
}

/// Create a title (admin)
pub async fn create_title(
    State(state): State<AppState>,
    method: Method,
    OptionalAuth(user): OptionalAuth,
    body: DeferredJson<CreateTitleRequest>,
) -> AppResult<(StatusCode, Json<TitleResponse>)> {
    permissions::admin_or_read_only(&method, user.as_ref()).into_result()?;
    let payload = body.parse()?;
    payload.validate()?;

    let details = TitleService::create(
        state.db(),
        &sanitize_string(&payload.name),
        payload.year,
        payload.description.as_deref(),
        &payload.genre,
        payload.category.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(details.into())))
}

/// Get a title
pub async fn get_title(
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
) -> AppResult<Json<TitleResponse>> {
    let details = TitleService::get(state.db(), &title_id).await?;
    Ok(Json(details.into()))
}

/// Update a title (admin)
pub async fn update_title(
    State(state): State<AppState>,
    method: Method,
    OptionalAuth(user): OptionalAuth,
    Path(title_id): Path<Uuid>,
    body: DeferredJson<UpdateTitleRequest>,
) -> AppResult<Json<TitleResponse>> {
    permissions::admin_or_read_only(&method, user.as_ref()).into_result()?;
    let payload = body.parse()?;
    payload.validate()?;

    let details = TitleService::update(state.db(), &title_id, payload.into()).await?;
    Ok(Json(details.into()))
}

/// Delete a title (admin)
pub async fn delete_title(
    State(state): State<AppState>,
    method: Method,
    OptionalAuth(user): OptionalAuth,
    Path(title_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    permissions::admin_or_read_only(&method, user.as_ref()).into_result()?;

    TitleService::delete(state.db(), &title_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
