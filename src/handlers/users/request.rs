//! User request DTOs

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::{
    constants::{MAX_EMAIL_LENGTH, MAX_PERSON_NAME_LENGTH, MAX_USERNAME_LENGTH},
    error::{AppError, AppResult},
    models::{NewUser, Role, UserChanges},
    utils::validate_username,
};

fn validate_role(role: &str) -> Result<(), ValidationError> {
    role.parse::<Role>().map(|_| ()).map_err(|msg| {
        let mut err = ValidationError::new("invalid_role");
        err.message = Some(msg.into());
        err
    })
}

fn parse_role(role: Option<&str>) -> AppResult<Option<Role>> {
    role.map(str::parse::<Role>)
        .transpose()
        .map_err(|msg| AppError::field("role", msg))
}

/// Create user request (admin)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 1, max = MAX_USERNAME_LENGTH),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[validate(email, length(max = MAX_EMAIL_LENGTH))]
    pub email: String,

    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub first_name: Option<String>,

    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub last_name: Option<String>,

    pub bio: Option<String>,

    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
}

impl CreateUserRequest {
    pub fn into_new_user(self) -> AppResult<NewUser> {
        Ok(NewUser {
            role: parse_role(self.role.as_deref())?.unwrap_or_default(),
            username: self.username,
            email: self.email,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            bio: self.bio.unwrap_or_default(),
        })
    }
}

/// Partial user update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 1, max = MAX_USERNAME_LENGTH),
        custom(function = "validate_username")
    )]
    pub username: Option<String>,

    #[validate(email, length(max = MAX_EMAIL_LENGTH))]
    pub email: Option<String>,

    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub first_name: Option<String>,

    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub last_name: Option<String>,

    pub bio: Option<String>,

    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_changes(self) -> AppResult<UserChanges> {
        Ok(UserChanges {
            role: parse_role(self.role.as_deref())?,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            bio: self.bio,
        })
    }
}

/// List users query parameters
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Username substring
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_outside_whitelist_is_rejected() {
        let request = UpdateUserRequest {
            username: None,
            email: None,
            first_name: None,
            last_name: None,
            bio: None,
            role: Some("superuser".to_string()),
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("role"));
    }

    #[test]
    fn test_create_defaults_to_user_role() {
        let request = CreateUserRequest {
            username: "reader".to_string(),
            email: "reader@example.com".to_string(),
            first_name: None,
            last_name: None,
            bio: Some("Reads a lot".to_string()),
            role: None,
        };
        assert!(request.validate().is_ok());

        let new = request.into_new_user().unwrap();
        assert_eq!(new.role, Role::User);
        assert_eq!(new.bio, "Reads a lot");
        assert_eq!(new.first_name, "");
    }

    #[test]
    fn test_changes_carry_parsed_role() {
        let request = UpdateUserRequest {
            username: None,
            email: None,
            first_name: Some("Ann".to_string()),
            last_name: None,
            bio: None,
            role: Some("moderator".to_string()),
        };

        let changes = request.into_changes().unwrap();
        assert_eq!(changes.role, Some(Role::Moderator));
        assert_eq!(changes.first_name.as_deref(), Some("Ann"));
    }

    #[test]
    fn test_forbidden_username_on_update() {
        let request = UpdateUserRequest {
            username: Some("ME".to_string()),
            email: None,
            first_name: None,
            last_name: None,
            bio: None,
            role: None,
        };
        assert!(request.validate().is_err());
    }
}
