//! Category/genre handler implementations

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    Extension, Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    handlers::{
        body::DeferredJson,
        pagination::{PageQuery, Paginated},
    },
    middleware::auth::OptionalAuth,
    models::{Taxon, Taxonomy},
    permissions,
    services::TaxonomyService,
    state::AppState,
    utils::sanitize_string,
};

use super::request::{CreateTaxonRequest, ListTaxaQuery};

/// List entries (public)
pub async fn list(
    State(state): State<AppState>,
    Extension(kind): Extension<Taxonomy>,
    Query(page): Query<PageQuery>,
    Query(query): Query<ListTaxaQuery>,
) -> AppResult<Json<Paginated<Taxon>>> {
    let (taxa, total) = TaxonomyService::list(
        state.db(),
        kind,
        query.search.as_deref(),
        page.offset() as i64,
        page.limit() as i64,
    )
    .await?;

    Ok(Json(Paginated::new(taxa, total, &page)))
}

/// Create an entry (admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(kind): Extension<Taxonomy>,
    method: Method,
    OptionalAuth(user): OptionalAuth,
    body: DeferredJson<CreateTaxonRequest>,
) -> AppResult<(StatusCode, Json<Taxon>)> {
    permissions::admin_or_read_only(&method, user.as_ref()).into_result()?;
    let payload = body.parse()?;
    payload.validate()?;

    let taxon = TaxonomyService::create(
        state.db(),
        kind,
        &sanitize_string(&payload.name),
        &payload.slug,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(taxon)))
}

/// Delete an entry by slug (admin)
pub async fn destroy(
    State(state): State<AppState>,
    Extension(kind): Extension<Taxonomy>,
    method: Method,
    OptionalAuth(user): OptionalAuth,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    permissions::admin_or_read_only(&method, user.as_ref()).into_result()?;

    TaxonomyService::delete(state.db(), kind, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
