//! Category and genre service

use sqlx::PgPool;
use tracing::info;

use crate::{
    db::repositories::TaxonomyRepository,
    error::{AppError, AppResult},
    models::{Taxon, Taxonomy},
};

/// Category/genre business logic
pub struct TaxonomyService;

impl TaxonomyService {
    /// List entries with pagination
    pub async fn list(
        pool: &PgPool,
        kind: Taxonomy,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Taxon>, i64)> {
        TaxonomyRepository::list(pool, kind, search, offset, limit).await
    }

    /// Create an entry; slugs are unique per table
    pub async fn create(pool: &PgPool, kind: Taxonomy, name: &str, slug: &str) -> AppResult<Taxon> {
        let taxon = TaxonomyRepository::create(pool, kind, name, slug)
            .await
            .map_err(|e| match e {
                AppError::AlreadyExists(_) => AppError::field(
                    "slug",
                    format!("{} with this slug already exists", kind.label()),
                ),
                other => other,
            })?;

        info!(kind = kind.table(), slug = %taxon.slug, "Created");
        Ok(taxon)
    }

    /// Delete an entry by slug
    pub async fn delete(pool: &PgPool, kind: Taxonomy, slug: &str) -> AppResult<()> {
        if !TaxonomyRepository::delete_by_slug(pool, kind, slug).await? {
            return Err(AppError::NotFound(format!("{} not found", kind.label())));
        }

        info!(kind = kind.table(), slug = %slug, "Deleted");
        Ok(())
    }
}
