//! Title response DTOs

use serde::Serialize;
use uuid::Uuid;

use crate::{models::Taxon, services::title_service::TitleDetails};

/// Title representation with nested genres and category
#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub rating: Option<i32>,
    pub description: Option<String>,
    pub genre: Vec<Taxon>,
    pub category: Option<Taxon>,
}

impl From<TitleDetails> for TitleResponse {
    fn from(details: TitleDetails) -> Self {
        Self {
            id: details.title.id,
            name: details.title.name,
            year: details.title.year,
            rating: details.title.rating,
            description: details.title.description,
            genre: details.genres,
            category: details.category,
        }
    }
}
