//! Title model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Title database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Title {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    /// Rounded mean of review scores, `None` without reviews
    pub rating: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Fields of a title to be inserted
#[derive(Debug, Clone)]
pub struct NewTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct TitleChanges {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Title list filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleFilter {
    /// Genre slug
    pub genre: Option<String>,
    /// Category slug
    pub category: Option<String>,
    pub year: Option<i32>,
    /// Substring of the title name
    pub name: Option<String>,
}
