//! Category and genre repository
//!
//! Both tables share one shape, so every query is parameterised by
//! [`Taxonomy`]. Table names come from a closed enum and are never user input.

use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use super::contains_pattern;
use crate::{
    error::AppResult,
    models::{Taxon, Taxonomy},
};

/// Genre row tagged with the title it is attached to
#[derive(Debug, Clone, FromRow)]
pub struct TitleGenre {
    pub title_id: Uuid,
    #[sqlx(flatten)]
    pub genre: Taxon,
}

/// Repository for category and genre operations
pub struct TaxonomyRepository;

impl TaxonomyRepository {
    /// Create an entry
    pub async fn create(pool: &PgPool, kind: Taxonomy, name: &str, slug: &str) -> AppResult<Taxon> {
        let sql = format!(
            "INSERT INTO {} (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
            kind.table()
        );

        let taxon = sqlx::query_as::<_, Taxon>(&sql)
            .bind(name)
            .bind(slug)
            .fetch_one(pool)
            .await?;

        Ok(taxon)
    }

    /// Find an entry by slug
    pub async fn find_by_slug(pool: &PgPool, kind: Taxonomy, slug: &str) -> AppResult<Option<Taxon>> {
        let sql = format!("SELECT id, name, slug FROM {} WHERE slug = $1", kind.table());

        let taxon = sqlx::query_as::<_, Taxon>(&sql)
            .bind(slug)
            .fetch_optional(pool)
            .await?;

        Ok(taxon)
    }

    /// Find all entries whose slug is in `slugs`
    pub async fn find_by_slugs(
        pool: &PgPool,
        kind: Taxonomy,
        slugs: &[String],
    ) -> AppResult<Vec<Taxon>> {
        let sql = format!(
            "SELECT id, name, slug FROM {} WHERE slug = ANY($1) ORDER BY slug",
            kind.table()
        );

        let taxa = sqlx::query_as::<_, Taxon>(&sql)
            .bind(slugs)
            .fetch_all(pool)
            .await?;

        Ok(taxa)
    }

    /// Find categories by ID
    pub async fn categories_by_ids(pool: &PgPool, ids: &[Uuid]) -> AppResult<Vec<Taxon>> {
        let categories = sqlx::query_as::<_, Taxon>(
            r#"SELECT id, name, slug FROM categories WHERE id = ANY($1)"#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// Delete an entry by slug
    pub async fn delete_by_slug(pool: &PgPool, kind: Taxonomy, slug: &str) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE slug = $1", kind.table());

        let result = sqlx::query(&sql).bind(slug).execute(pool).await?;

        Ok(result.rows_affected() > 0)
    }

    /// List entries ordered by name, optionally filtered by a name substring
    pub async fn list(
        pool: &PgPool,
        kind: Taxonomy,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Taxon>, i64)> {
        let search_pattern = search.map(contains_pattern);

        let sql = format!(
            r#"
            SELECT id, name, slug FROM {}
            WHERE $1::text IS NULL OR name ILIKE $1
            ORDER BY name, slug
            OFFSET $2 LIMIT $3
            "#,
            kind.table()
        );
        let taxa = sqlx::query_as::<_, Taxon>(&sql)
            .bind(&search_pattern)
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM {} WHERE $1::text IS NULL OR name ILIKE $1",
            kind.table()
        );
        let count: i64 = sqlx::query_scalar(&count_sql)
            .bind(&search_pattern)
            .fetch_one(pool)
            .await?;

        Ok((taxa, count))
    }

    /// Genres attached to any of `title_ids`
    pub async fn genres_for_titles(pool: &PgPool, title_ids: &[Uuid]) -> AppResult<Vec<TitleGenre>> {
        let rows = sqlx::query_as::<_, TitleGenre>(
            r#"
            SELECT tg.title_id, g.id, g.name, g.slug
            FROM title_genres tg
            JOIN genres g ON g.id = tg.genre_id
            WHERE tg.title_id = ANY($1)
            ORDER BY g.name
            "#,
        )
        .bind(title_ids)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Replace the genre set of a title
    pub async fn set_title_genres(
        conn: &mut PgConnection,
        title_id: &Uuid,
        genre_ids: &[Uuid],
    ) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM title_genres WHERE title_id = $1"#)
            .bind(title_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO title_genres (title_id, genre_id)
            SELECT $1, UNNEST($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(title_id)
        .bind(genre_ids)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
