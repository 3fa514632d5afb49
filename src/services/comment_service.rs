//! Comment service

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::repositories::CommentRepository,
    error::{AppError, AppResult},
    models::{Comment, Review},
    services::review_service::ReviewService,
};

/// Comment service for business logic
pub struct CommentService;

impl CommentService {
    /// List comments of a review
    pub async fn list(
        pool: &PgPool,
        title_id: &Uuid,
        review_id: &Uuid,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Comment>, i64)> {
        let review = ReviewService::get(pool, title_id, review_id).await?;
        CommentRepository::list_for_review(pool, &review.id, offset, limit).await
    }

    /// Get a comment; the whole title/review/comment path must match
    pub async fn get(
        pool: &PgPool,
        title_id: &Uuid,
        review_id: &Uuid,
        comment_id: &Uuid,
    ) -> AppResult<Comment> {
        let review = ReviewService::get(pool, title_id, review_id).await?;
        CommentRepository::find(pool, &review.id, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
    }

    /// Comment on `review`
    pub async fn create(
        pool: &PgPool,
        review: &Review,
        author_id: &Uuid,
        text: &str,
    ) -> AppResult<Comment> {
        let comment = CommentRepository::create(pool, &review.id, author_id, text).await?;

        info!(comment_id = %comment.id, review_id = %review.id, author = %comment.author, "Comment created");
        Ok(comment)
    }

    /// Replace the text of `comment`
    pub async fn update(pool: &PgPool, comment: &Comment, text: &str) -> AppResult<Comment> {
        let updated = CommentRepository::update(pool, &comment.id, text).await?;

        info!(comment_id = %comment.id, "Comment updated");
        Ok(updated)
    }

    /// Delete `comment`
    pub async fn delete(pool: &PgPool, comment: &Comment) -> AppResult<()> {
        if !CommentRepository::delete(pool, &comment.id).await? {
            return Err(AppError::NotFound("Comment not found".to_string()));
        }

        info!(comment_id = %comment.id, "Comment deleted");
        Ok(())
    }
}
