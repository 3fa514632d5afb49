//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::roles;

/// User roles, ordered by privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => roles::USER,
            Self::Moderator => roles::MODERATOR,
            Self::Admin => roles::ADMIN,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            roles::USER => Ok(Self::User),
            roles::MODERATOR => Ok(Self::Moderator),
            roles::ADMIN => Ok(Self::Admin),
            other => Err(format!(
                "Invalid role: {}. Valid roles: {}",
                other,
                roles::ALL.join(", ")
            )),
        }
    }
}

/// Capability checks shared by stored users and authenticated principals
pub trait Capabilities {
    fn role(&self) -> Role;
    fn is_superuser(&self) -> bool;

    /// Admin role or superuser flag
    fn is_admin(&self) -> bool {
        self.role() == Role::Admin || self.is_superuser()
    }

    /// Admin or moderator role
    fn is_moder(&self) -> bool {
        matches!(self.role(), Role::Admin | Role::Moderator)
    }
}

/// User database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Capabilities for User {
    fn role(&self) -> Role {
        self.role
    }

    fn is_superuser(&self) -> bool {
        self.is_superuser
    }
}

/// Fields of a user to be inserted
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn user(username: &str, role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role,
            is_superuser: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_by_role() {
        let user = fixtures::user("reader", Role::User);
        assert!(!user.is_admin());
        assert!(!user.is_moder());

        let moderator = fixtures::user("moder", Role::Moderator);
        assert!(!moderator.is_admin());
        assert!(moderator.is_moder());

        let admin = fixtures::user("boss", Role::Admin);
        assert!(admin.is_admin());
        assert!(admin.is_moder());
    }

    #[test]
    fn test_superuser_is_admin_but_not_moder() {
        let mut root = fixtures::user("root", Role::User);
        root.is_superuser = true;

        assert!(root.is_admin());
        assert!(!root.is_moder());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("moderator".parse::<Role>().unwrap(), Role::Moderator);
        assert!("superuser".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }
}
