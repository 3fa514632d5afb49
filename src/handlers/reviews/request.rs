//! Review request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::utils::validate_score;

/// Create review request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1))]
    pub text: String,

    #[validate(custom(function = "validate_score"))]
    pub score: i16,
}

/// Partial review update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(length(min = 1))]
    pub text: Option<String>,

    #[validate(custom(function = "validate_score"))]
    pub score: Option<i16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        for (score, ok) in [(0, false), (1, true), (10, true), (11, false)] {
            let request = CreateReviewRequest {
                text: "Solid".to_string(),
                score,
            };
            assert_eq!(request.validate().is_ok(), ok, "score {}", score);
        }
    }

    #[test]
    fn test_empty_text() {
        let request = CreateReviewRequest {
            text: String::new(),
            score: 5,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("text"));
    }

    #[test]
    fn test_partial_update() {
        let request = UpdateReviewRequest {
            text: None,
            score: Some(12),
        };
        assert!(request.validate().is_err());

        let request = UpdateReviewRequest {
            text: Some("Changed my mind".to_string()),
            score: None,
        };
        assert!(request.validate().is_ok());
    }
}
