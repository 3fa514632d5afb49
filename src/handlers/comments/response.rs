//! Comment response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::Comment;

/// Comment representation
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub pub_date: DateTime<Utc>,
    pub review_id: Uuid,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            author: comment.author,
            pub_date: comment.pub_date,
            review_id: comment.review_id,
        }
    }
}
