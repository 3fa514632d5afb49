//! User repository

use sqlx::PgPool;
use uuid::Uuid;

use super::contains_pattern;
use crate::{
    error::AppResult,
    models::{NewUser, Role, User, UserChanges},
};

/// Repository for user database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(pool: &PgPool, new: &NewUser) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, first_name, last_name, bio, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.bio)
        .bind(new.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Find user by username
    pub async fn find_by_username(pool: &PgPool, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE username = $1"#)
            .bind(username)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Find user by email (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> AppResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE LOWER(email) = LOWER($1)"#)
                .bind(email)
                .fetch_optional(pool)
                .await?;

        Ok(user)
    }

    /// Apply a partial update
    pub async fn update(pool: &PgPool, id: &Uuid, changes: &UserChanges) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                bio = COALESCE($6, bio),
                role = COALESCE($7, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.username.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.first_name.as_deref())
        .bind(changes.last_name.as_deref())
        .bind(changes.bio.as_deref())
        .bind(changes.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Delete a user; reviews, comments and codes go with it
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List users ordered by username, optionally filtered by a username substring
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)> {
        let search_pattern = search.map(contains_pattern);

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE $1::text IS NULL OR username ILIKE $1
            ORDER BY username
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(&search_pattern)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM users WHERE $1::text IS NULL OR username ILIKE $1"#,
        )
        .bind(&search_pattern)
        .fetch_one(pool)
        .await?;

        Ok((users, count))
    }

    /// Create or promote the bootstrap superuser
    pub async fn upsert_superuser(pool: &PgPool, username: &str, email: &str) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, role, is_superuser)
            VALUES ($1, $2, $3, TRUE)
            ON CONFLICT (username) DO UPDATE
            SET role = EXCLUDED.role, is_superuser = TRUE, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(Role::Admin)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }
}
