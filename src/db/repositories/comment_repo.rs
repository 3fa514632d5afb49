//! Comment repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, models::Comment};

/// Repository for comment database operations
pub struct CommentRepository;

impl CommentRepository {
    /// Create a comment on a review
    pub async fn create(
        pool: &PgPool,
        review_id: &Uuid,
        author_id: &Uuid,
        text: &str,
    ) -> AppResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (review_id, author_id, text)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT c.id, c.review_id, c.author_id, u.username AS author, c.text, c.pub_date
            FROM inserted c
            JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(review_id)
        .bind(author_id)
        .bind(text)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Find a comment of a given review
    pub async fn find(pool: &PgPool, review_id: &Uuid, id: &Uuid) -> AppResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.review_id, c.author_id, u.username AS author, c.text, c.pub_date
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.review_id = $1 AND c.id = $2
            "#,
        )
        .bind(review_id)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    /// Replace the comment text
    pub async fn update(pool: &PgPool, id: &Uuid, text: &str) -> AppResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            WITH updated AS (
                UPDATE comments SET text = $2 WHERE id = $1 RETURNING *
            )
            SELECT c.id, c.review_id, c.author_id, u.username AS author, c.text, c.pub_date
            FROM updated c
            JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(id)
        .bind(text)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Delete a comment
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM comments WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List comments of a review, newest first
    pub async fn list_for_review(
        pool: &PgPool,
        review_id: &Uuid,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Comment>, i64)> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.review_id, c.author_id, u.username AS author, c.text, c.pub_date
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.review_id = $1
            ORDER BY c.pub_date DESC, c.id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(review_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM comments WHERE review_id = $1"#)
                .bind(review_id)
                .fetch_one(pool)
                .await?;

        Ok((comments, count))
    }
}
