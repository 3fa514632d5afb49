//! User service

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    config::BootstrapConfig,
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::{Capabilities, NewUser, User, UserChanges},
};

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Get user by username
    pub async fn get_by_username(pool: &PgPool, username: &str) -> AppResult<User> {
        UserRepository::find_by_username(pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Get user by ID
    pub async fn get_by_id(pool: &PgPool, id: &Uuid) -> AppResult<User> {
        UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// List users with pagination
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)> {
        UserRepository::list(pool, search, offset, limit).await
    }

    /// Create a user on behalf of an admin
    pub async fn create(pool: &PgPool, mut new: NewUser) -> AppResult<User> {
        new.email = new.email.trim().to_lowercase();

        let user = UserRepository::create(pool, &new)
            .await
            .map_err(Self::duplicate)?;

        info!(user_id = %user.id, username = %user.username, role = %user.role, "User created");
        Ok(user)
    }

    /// Update the user named `username`
    pub async fn update(pool: &PgPool, username: &str, changes: UserChanges) -> AppResult<User> {
        let user = Self::get_by_username(pool, username).await?;
        Self::apply(pool, &user, changes).await
    }

    /// Update the requester's own profile; only admins may change their role
    pub async fn update_me(
        pool: &PgPool,
        requester: &impl Capabilities,
        id: &Uuid,
        mut changes: UserChanges,
    ) -> AppResult<User> {
        if !requester.is_admin() {
            changes.role = None;
        }

        let user = Self::get_by_id(pool, id).await?;
        Self::apply(pool, &user, changes).await
    }

    /// Delete the user named `username`
    pub async fn delete(pool: &PgPool, username: &str) -> AppResult<()> {
        let user = Self::get_by_username(pool, username).await?;
        UserRepository::delete(pool, &user.id).await?;

        info!(user_id = %user.id, username = %user.username, "User deleted");
        Ok(())
    }

    /// Make sure the configured bootstrap superuser exists
    pub async fn ensure_superuser(pool: &PgPool, config: &BootstrapConfig) -> AppResult<Option<User>> {
        let (Some(username), Some(email)) = (&config.admin_username, &config.admin_email) else {
            return Ok(None);
        };

        let user = UserRepository::upsert_superuser(pool, username, &email.to_lowercase()).await?;
        info!(user_id = %user.id, username = %user.username, "Bootstrap superuser ensured");

        Ok(Some(user))
    }

    async fn apply(pool: &PgPool, user: &User, mut changes: UserChanges) -> AppResult<User> {
        if let Some(email) = changes.email.as_mut() {
            *email = email.trim().to_lowercase();
        }

        let role_change = changes.role.filter(|r| *r != user.role);
        let updated = UserRepository::update(pool, &user.id, &changes)
            .await
            .map_err(Self::duplicate)?;

        if let Some(role) = role_change {
            info!(user_id = %user.id, from = %user.role, to = %role, "User role changed");
        }
        Ok(updated)
    }

    fn duplicate(err: AppError) -> AppError {
        match err {
            AppError::AlreadyExists(_) => {
                AppError::field("username", "A user with this username or email already exists")
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_becomes_field_error() {
        let err = UserService::duplicate(AppError::AlreadyExists("x".into()));
        assert!(matches!(err, AppError::InvalidFields(_)));

        let err = UserService::duplicate(AppError::NotFound("x".into()));
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
