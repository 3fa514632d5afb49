//! Review service
//!
//! Every mutation runs in one transaction with the title row locked, and the
//! title rating is recomputed before commit.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::repositories::{ReviewRepository, TitleRepository},
    error::{AppError, AppResult},
    models::Review,
    services::{rating_service::RatingService, title_service::TitleService},
};

/// Review service for business logic
pub struct ReviewService;

impl ReviewService {
    /// List reviews of a title
    pub async fn list(
        pool: &PgPool,
        title_id: &Uuid,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Review>, i64)> {
        TitleService::find(pool, title_id).await?;
        ReviewRepository::list_for_title(pool, title_id, offset, limit).await
    }

    /// Get a review of a title
    pub async fn get(pool: &PgPool, title_id: &Uuid, review_id: &Uuid) -> AppResult<Review> {
        TitleService::find(pool, title_id).await?;
        ReviewRepository::find(pool, title_id, review_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found".to_string()))
    }

    /// Create a review; one per author and title
    pub async fn create(
        pool: &PgPool,
        title_id: &Uuid,
        author_id: &Uuid,
        text: &str,
        score: i16,
    ) -> AppResult<Review> {
        let mut tx = pool.begin().await?;

        if !TitleRepository::lock(&mut *tx, title_id).await? {
            return Err(AppError::NotFound("Title not found".to_string()));
        }

        if ReviewRepository::exists_for_author(&mut *tx, title_id, author_id).await? {
            return Err(Self::duplicate());
        }

        let review = ReviewRepository::create(&mut *tx, title_id, author_id, text, score)
            .await
            .map_err(|e| match e {
                AppError::AlreadyExists(_) => Self::duplicate(),
                other => other,
            })?;

        RatingService::recompute(&mut tx, title_id).await?;
        tx.commit().await?;

        info!(review_id = %review.id, title_id = %title_id, author = %review.author, score = review.score, "Review created");
        Ok(review)
    }

    /// Update text and/or score of `review`
    pub async fn update(
        pool: &PgPool,
        review: &Review,
        text: Option<&str>,
        score: Option<i16>,
    ) -> AppResult<Review> {
        let mut tx = pool.begin().await?;

        TitleRepository::lock(&mut *tx, &review.title_id).await?;
        let updated = ReviewRepository::update(&mut *tx, &review.id, text, score).await?;
        RatingService::recompute(&mut tx, &review.title_id).await?;

        tx.commit().await?;

        info!(review_id = %review.id, score = updated.score, "Review updated");
        Ok(updated)
    }

    /// Delete `review` and its comments
    pub async fn delete(pool: &PgPool, review: &Review) -> AppResult<()> {
        let mut tx = pool.begin().await?;

        TitleRepository::lock(&mut *tx, &review.title_id).await?;
        if !ReviewRepository::delete(&mut *tx, &review.id).await? {
            return Err(AppError::NotFound("Review not found".to_string()));
        }
        RatingService::recompute(&mut tx, &review.title_id).await?;

        tx.commit().await?;

        info!(review_id = %review.id, title_id = %review.title_id, "Review deleted");
        Ok(())
    }

    fn duplicate() -> AppError {
        AppError::field("title", "You have already reviewed this title")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_duplicate_review_is_a_validation_error() {
        let err = ReviewService::duplicate();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
