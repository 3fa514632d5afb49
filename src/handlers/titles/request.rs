//! Title request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::{MAX_NAME_LENGTH, MAX_SLUG_LENGTH},
    services::title_service::TitleUpdate,
    utils::{sanitize_string, validate_year},
};

/// Create title request; genre and category are given by slug
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTitleRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,

    #[validate(custom(function = "validate_year"))]
    pub year: i32,

    pub description: Option<String>,

    #[serde(default)]
    pub genre: Vec<String>,

    #[validate(length(min = 1, max = MAX_SLUG_LENGTH))]
    pub category: Option<String>,
}

/// Partial title update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTitleRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_year"))]
    pub year: Option<i32>,

    pub description: Option<String>,

    pub genre: Option<Vec<String>>,

    #[validate(length(min = 1, max = MAX_SLUG_LENGTH))]
    pub category: Option<String>,
}

impl From<UpdateTitleRequest> for TitleUpdate {
    fn from(req: UpdateTitleRequest) -> Self {
        Self {
            name: req.name.as_deref().map(sanitize_string),
            year: req.year,
            description: req.description,
            genre: req.genre,
            category: req.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};

    #[test]
    fn test_future_year_is_rejected() {
        let request = CreateTitleRequest {
            name: "Dune".to_string(),
            year: Utc::now().year() + 1,
            description: None,
            genre: vec!["sci-fi".to_string()],
            category: Some("movie".to_string()),
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("year"));
    }

    #[test]
    fn test_genre_defaults_to_empty() {
        let request: CreateTitleRequest =
            serde_json::from_str(r#"{"name": "Dune", "year": 1965}"#).unwrap();
        assert!(request.genre.is_empty());
        assert!(request.category.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_year_checked_only_when_present() {
        let request = UpdateTitleRequest {
            name: None,
            year: None,
            description: Some("Spice".to_string()),
            genre: None,
            category: None,
        };
        assert!(request.validate().is_ok());
    }
}
