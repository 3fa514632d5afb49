//! Review and comment models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Review row joined with its author's username
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub title_id: Uuid,
    pub author_id: Uuid,
    /// Author username
    pub author: String,
    pub text: String,
    pub score: i16,
    pub pub_date: DateTime<Utc>,
}

/// Comment row joined with its author's username
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub review_id: Uuid,
    pub author_id: Uuid,
    pub author: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}
