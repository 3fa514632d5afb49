//! Review response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::Review;

/// Review representation
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub text: String,
    /// Author username
    pub author: String,
    pub score: i16,
    pub pub_date: DateTime<Utc>,
    pub title: Uuid,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            text: review.text,
            author: review.author,
            score: review.score,
            pub_date: review.pub_date,
            title: review.title_id,
        }
    }
}
