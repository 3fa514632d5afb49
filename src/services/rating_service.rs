//! Title rating recomputation
//!
//! Runs after every review insert, update or delete, inside the same
//! transaction as the change that triggered it.

use sqlx::{Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::{
    db::repositories::{ReviewRepository, TitleRepository},
    error::AppResult,
};

/// Rating service
pub struct RatingService;

impl RatingService {
    /// Mean of `scores` rounded half-to-even, `None` for no scores
    pub fn average(scores: &[i16]) -> Option<i32> {
        if scores.is_empty() {
            return None;
        }
        let sum: i64 = scores.iter().map(|&s| s as i64).sum();
        let mean = sum as f64 / scores.len() as f64;
        Some(mean.round_ties_even() as i32)
    }

    /// Recompute and store the rating of `title_id`
    pub async fn recompute(
        tx: &mut Transaction<'_, Postgres>,
        title_id: &Uuid,
    ) -> AppResult<Option<i32>> {
        let scores = ReviewRepository::scores_for_title(&mut **tx, title_id).await?;
        let rating = Self::average(&scores);

        TitleRepository::set_rating(&mut **tx, title_id, rating).await?;

        info!(title_id = %title_id, reviews = scores.len(), rating = ?rating, "Title rating recomputed");
        Ok(rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_no_reviews_is_none() {
        assert_eq!(RatingService::average(&[]), None);
    }

    #[test]
    fn test_average_after_deletions() {
        assert_eq!(RatingService::average(&[3, 7]), Some(5));
        // score-7 review removed
        assert_eq!(RatingService::average(&[3]), Some(3));
    }

    #[test]
    fn test_average_rounds_to_nearest() {
        assert_eq!(RatingService::average(&[7, 8, 8]), Some(8)); // 7.67
        assert_eq!(RatingService::average(&[1, 1, 2]), Some(1)); // 1.33
    }

    #[test]
    fn test_average_ties_round_to_even() {
        assert_eq!(RatingService::average(&[4, 5]), Some(4)); // 4.5
        assert_eq!(RatingService::average(&[5, 6]), Some(6)); // 5.5
        assert_eq!(RatingService::average(&[9, 10]), Some(10)); // 9.5
    }
}
