//! Category/genre request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::{MAX_NAME_LENGTH, MAX_SLUG_LENGTH},
    utils::validate_slug,
};

/// Create category/genre request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaxonRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,

    #[validate(
        length(min = 1, max = MAX_SLUG_LENGTH),
        custom(function = "validate_slug")
    )]
    pub slug: String,
}

/// List query parameters
#[derive(Debug, Deserialize)]
pub struct ListTaxaQuery {
    /// Name substring
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, slug: &str) -> CreateTaxonRequest {
        CreateTaxonRequest {
            name: name.to_string(),
            slug: slug.to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("Science fiction", "sci-fi").validate().is_ok());
    }

    #[test]
    fn test_bad_slug() {
        let errors = request("Films", "films!").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("slug"));
    }

    #[test]
    fn test_slug_too_long() {
        let errors = request("Films", &"a".repeat(51)).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("slug"));
    }

    #[test]
    fn test_name_too_long() {
        let errors = request(&"n".repeat(257), "films").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }
}
