//! Confirmation code repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, models::VerifyCode};

/// Repository for `verify_codes` rows
pub struct VerifyCodeRepository;

impl VerifyCodeRepository {
    /// Insert `code`, retiring every earlier unused code of the same user
    pub async fn replace(pool: &PgPool, code: &VerifyCode) -> AppResult<()> {
        let mut tx = pool.begin().await?;

        sqlx::query(r#"UPDATE verify_codes SET is_used = TRUE WHERE user_id = $1 AND NOT is_used"#)
            .bind(code.user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO verify_codes (id, user_id, code_hash, created_at, expires_at, failed_attempts, is_used)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(code.id)
        .bind(code.user_id)
        .bind(&code.code_hash)
        .bind(code.created_at)
        .bind(code.expires_at)
        .bind(code.failed_attempts)
        .bind(code.is_used)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Most recently issued code still marked unused
    pub async fn find_latest(pool: &PgPool, user_id: &Uuid) -> AppResult<Option<VerifyCode>> {
        let code = sqlx::query_as::<_, VerifyCode>(
            r#"
            SELECT * FROM verify_codes
            WHERE user_id = $1 AND NOT is_used
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(code)
    }

    /// Persist the counters and the used flag
    pub async fn update_state(pool: &PgPool, code: &VerifyCode) -> AppResult<()> {
        sqlx::query(r#"UPDATE verify_codes SET failed_attempts = $2, is_used = $3 WHERE id = $1"#)
            .bind(code.id)
            .bind(code.failed_attempts)
            .bind(code.is_used)
            .execute(pool)
            .await?;

        Ok(())
    }
}
