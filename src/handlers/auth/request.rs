//! Authentication request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::{MAX_EMAIL_LENGTH, MAX_USERNAME_LENGTH},
    utils::validate_username,
};

/// Sign-up request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email, length(max = MAX_EMAIL_LENGTH))]
    pub email: String,

    #[validate(
        length(min = 1, max = MAX_USERNAME_LENGTH),
        custom(function = "validate_username")
    )]
    pub username: String,
}

/// Confirmation code exchange request
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH))]
    pub username: String,

    #[validate(length(min = 1))]
    pub confirmation_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, email: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            username: username.to_string(),
        }
    }

    #[test]
    fn test_valid_signup() {
        assert!(signup("reader", "reader@example.com").validate().is_ok());
    }

    #[test]
    fn test_forbidden_username_any_case() {
        for name in ["me", "Me", "ME"] {
            let errors = signup(name, "me@example.com").validate().unwrap_err();
            assert!(errors.field_errors().contains_key("username"));
        }
    }

    #[test]
    fn test_bad_email_and_long_username() {
        let errors = signup(&"x".repeat(151), "not-an-email")
            .validate()
            .unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("username"));
    }

    #[test]
    fn test_empty_confirmation_code() {
        let request = TokenRequest {
            username: "reader".to_string(),
            confirmation_code: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
