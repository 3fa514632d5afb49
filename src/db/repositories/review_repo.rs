//! Review repository

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{error::AppResult, models::Review};

/// Repository for review database operations
pub struct ReviewRepository;

impl ReviewRepository {
    /// Create a review
    pub async fn create(
        conn: &mut PgConnection,
        title_id: &Uuid,
        author_id: &Uuid,
        text: &str,
        score: i16,
    ) -> AppResult<Review> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            WITH inserted AS (
                INSERT INTO reviews (title_id, author_id, text, score)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT r.id, r.title_id, r.author_id, u.username AS author, r.text, r.score, r.pub_date
            FROM inserted r
            JOIN users u ON u.id = r.author_id
            "#,
        )
        .bind(title_id)
        .bind(author_id)
        .bind(text)
        .bind(score)
        .fetch_one(conn)
        .await?;

        Ok(review)
    }

    /// Find a review of a given title
    pub async fn find(pool: &PgPool, title_id: &Uuid, id: &Uuid) -> AppResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT r.id, r.title_id, r.author_id, u.username AS author, r.text, r.score, r.pub_date
            FROM reviews r
            JOIN users u ON u.id = r.author_id
            WHERE r.title_id = $1 AND r.id = $2
            "#,
        )
        .bind(title_id)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(review)
    }

    /// Whether `author_id` already reviewed `title_id`
    pub async fn exists_for_author(
        conn: &mut PgConnection,
        title_id: &Uuid,
        author_id: &Uuid,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2)"#,
        )
        .bind(title_id)
        .bind(author_id)
        .fetch_one(conn)
        .await?;

        Ok(exists)
    }

    /// Update text and/or score
    pub async fn update(
        conn: &mut PgConnection,
        id: &Uuid,
        text: Option<&str>,
        score: Option<i16>,
    ) -> AppResult<Review> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            WITH updated AS (
                UPDATE reviews
                SET text = COALESCE($2, text), score = COALESCE($3, score)
                WHERE id = $1
                RETURNING *
            )
            SELECT r.id, r.title_id, r.author_id, u.username AS author, r.text, r.score, r.pub_date
            FROM updated r
            JOIN users u ON u.id = r.author_id
            "#,
        )
        .bind(id)
        .bind(text)
        .bind(score)
        .fetch_one(conn)
        .await?;

        Ok(review)
    }

    /// Delete a review and its comments
    pub async fn delete(conn: &mut PgConnection, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM reviews WHERE id = $1"#)
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All scores currently given to a title
    pub async fn scores_for_title(conn: &mut PgConnection, title_id: &Uuid) -> AppResult<Vec<i16>> {
        let scores: Vec<i16> =
            sqlx::query_scalar(r#"SELECT score FROM reviews WHERE title_id = $1"#)
                .bind(title_id)
                .fetch_all(conn)
                .await?;

        Ok(scores)
    }

    /// List reviews of a title, newest first
    pub async fn list_for_title(
        pool: &PgPool,
        title_id: &Uuid,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Review>, i64)> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT r.id, r.title_id, r.author_id, u.username AS author, r.text, r.score, r.pub_date
            FROM reviews r
            JOIN users u ON u.id = r.author_id
            WHERE r.title_id = $1
            ORDER BY r.pub_date DESC, r.id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(title_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM reviews WHERE title_id = $1"#)
            .bind(title_id)
            .fetch_one(pool)
            .await?;

        Ok((reviews, count))
    }
}
