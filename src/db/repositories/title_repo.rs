//! Title repository

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::contains_pattern;
use crate::{
    error::AppResult,
    models::{NewTitle, Title, TitleChanges, TitleFilter},
};

/// Repository for title database operations
pub struct TitleRepository;

impl TitleRepository {
    /// Create a new title
    pub async fn create(conn: &mut PgConnection, new: &NewTitle) -> AppResult<Title> {
        let title = sqlx::query_as::<_, Title>(
            r#"
            INSERT INTO titles (name, year, description, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(new.year)
        .bind(new.description.as_deref())
        .bind(new.category_id)
        .fetch_one(conn)
        .await?;

        Ok(title)
    }

    /// Find title by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Title>> {
        let title = sqlx::query_as::<_, Title>(r#"SELECT * FROM titles WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(title)
    }

    /// Apply a partial update
    pub async fn update(
        conn: &mut PgConnection,
        id: &Uuid,
        changes: &TitleChanges,
    ) -> AppResult<Option<Title>> {
        let title = sqlx::query_as::<_, Title>(
            r#"
            UPDATE titles
            SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = COALESCE($4, description),
                category_id = COALESCE($5, category_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.year)
        .bind(changes.description.as_deref())
        .bind(changes.category_id)
        .fetch_optional(conn)
        .await?;

        Ok(title)
    }

    /// Delete a title and, by cascade, its reviews and comments
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM titles WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Store a recomputed rating
    pub async fn set_rating(
        conn: &mut PgConnection,
        id: &Uuid,
        rating: Option<i32>,
    ) -> AppResult<()> {
        sqlx::query(r#"UPDATE titles SET rating = $2 WHERE id = $1"#)
            .bind(id)
            .bind(rating)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// List titles matching `filter`, newest first
    pub async fn list(
        pool: &PgPool,
        filter: &TitleFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Title>, i64)> {
        let name_pattern = filter.name.as_deref().map(contains_pattern);

        let titles = sqlx::query_as::<_, Title>(
            r#"
            SELECT t.* FROM titles t
            LEFT JOIN categories c ON c.id = t.category_id
            WHERE
                ($1::text IS NULL OR c.slug = $1)
                AND ($2::text IS NULL OR EXISTS (
                    SELECT 1 FROM title_genres tg
                    JOIN genres g ON g.id = tg.genre_id
                    WHERE tg.title_id = t.id AND g.slug = $2
                ))
                AND ($3::int IS NULL OR t.year = $3)
                AND ($4::text IS NULL OR t.name ILIKE $4)
            ORDER BY t.created_at DESC, t.id
            OFFSET $5 LIMIT $6
            "#,
        )
        .bind(filter.category.as_deref())
        .bind(filter.genre.as_deref())
        .bind(filter.year)
        .bind(&name_pattern)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM titles t
            LEFT JOIN categories c ON c.id = t.category_id
            WHERE
                ($1::text IS NULL OR c.slug = $1)
                AND ($2::text IS NULL OR EXISTS (
                    SELECT 1 FROM title_genres tg
                    JOIN genres g ON g.id = tg.genre_id
                    WHERE tg.title_id = t.id AND g.slug = $2
                ))
                AND ($3::int IS NULL OR t.year = $3)
                AND ($4::text IS NULL OR t.name ILIKE $4)
            "#,
        )
        .bind(filter.category.as_deref())
        .bind(filter.genre.as_deref())
        .bind(filter.year)
        .bind(&name_pattern)
        .fetch_one(pool)
        .await?;

        Ok((titles, count))
    }

    /// Lock the title row for the rest of the transaction
    pub async fn lock(conn: &mut PgConnection, id: &Uuid) -> AppResult<bool> {
        let found: Option<Uuid> =
            sqlx::query_scalar(r#"SELECT id FROM titles WHERE id = $1 FOR UPDATE"#)
                .bind(id)
                .fetch_optional(conn)
                .await?;

        Ok(found.is_some())
    }
}
