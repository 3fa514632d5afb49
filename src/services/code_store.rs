//! Confirmation code storage backends

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use sqlx::PgPool;

use crate::{
    config::CodeBackend,
    constants::CONFIRMATION_CODE_KEY_PREFIX,
    db::repositories::VerifyCodeRepository,
    error::{AppError, AppResult},
    models::{User, VerifyCode},
};

/// Where issued confirmation codes are kept between sign-up and token exchange
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Store a freshly issued code, superseding any previous one for the user
    async fn save(&self, user: &User, code: &VerifyCode, ttl: Duration) -> AppResult<()>;

    /// Current code for the user, if any
    async fn load(&self, user: &User) -> AppResult<Option<VerifyCode>>;

    /// Persist counters after a failed attempt
    async fn update(&self, user: &User, code: &VerifyCode) -> AppResult<()>;

    /// Retire a code that can no longer be redeemed
    async fn discard(&self, user: &User, code: &VerifyCode) -> AppResult<()>;
}

/// Build the store selected by configuration
pub fn build(backend: CodeBackend, db: PgPool, redis: ConnectionManager) -> Arc<dyn CodeStore> {
    match backend {
        CodeBackend::Cache => Arc::new(RedisCodeStore::new(redis)),
        CodeBackend::Database => Arc::new(PgCodeStore::new(db)),
        CodeBackend::Memory => Arc::new(MemoryCodeStore::new()),
    }
}

/// Cache key for a user's code
pub fn cache_key(user: &User) -> String {
    format!("{}{}", CONFIRMATION_CODE_KEY_PREFIX, user.email.to_lowercase())
}

/// Redis-backed store: one JSON entry per email, expiring with the code
pub struct RedisCodeStore {
    redis: ConnectionManager,
}

impl RedisCodeStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

fn encode(code: &VerifyCode) -> AppResult<String> {
    serde_json::to_string(code)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode code entry: {}", e)))
}

#[async_trait]
impl CodeStore for RedisCodeStore {
    async fn save(&self, user: &User, code: &VerifyCode, ttl: Duration) -> AppResult<()> {
        let mut redis = self.redis.clone();
        let ttl_secs = ttl.num_seconds().max(1) as u64;
        redis
            .set_ex::<_, _, ()>(cache_key(user), encode(code)?, ttl_secs)
            .await?;
        Ok(())
    }

    async fn load(&self, user: &User) -> AppResult<Option<VerifyCode>> {
        let mut redis = self.redis.clone();
        let raw: Option<String> = redis.get(cache_key(user)).await?;

        match raw {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(code) => Ok(Some(code)),
                Err(e) => {
                    // Unreadable entries are treated as absent
                    tracing::warn!(user_id = %user.id, error = %e, "Dropping malformed confirmation code entry");
                    redis.del::<_, ()>(cache_key(user)).await?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn update(&self, user: &User, code: &VerifyCode) -> AppResult<()> {
        let mut redis = self.redis.clone();
        // XX: never resurrect an entry that expired meanwhile
        let _: () = redis::cmd("SET")
            .arg(cache_key(user))
            .arg(encode(code)?)
            .arg("KEEPTTL")
            .arg("XX")
            .query_async(&mut redis)
            .await?;
        Ok(())
    }

    async fn discard(&self, user: &User, _code: &VerifyCode) -> AppResult<()> {
        let mut redis = self.redis.clone();
        redis.del::<_, ()>(cache_key(user)).await?;
        Ok(())
    }
}

/// Database-backed store: codes are kept as `verify_codes` rows
pub struct PgCodeStore {
    db: PgPool,
}

impl PgCodeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CodeStore for PgCodeStore {
    async fn save(&self, _user: &User, code: &VerifyCode, _ttl: Duration) -> AppResult<()> {
        VerifyCodeRepository::replace(&self.db, code).await
    }

    async fn load(&self, user: &User) -> AppResult<Option<VerifyCode>> {
        VerifyCodeRepository::find_latest(&self.db, &user.id).await
    }

    async fn update(&self, _user: &User, code: &VerifyCode) -> AppResult<()> {
        VerifyCodeRepository::update_state(&self.db, code).await
    }

    async fn discard(&self, _user: &User, code: &VerifyCode) -> AppResult<()> {
        // Rows are kept for auditing; their state already marks them unusable
        VerifyCodeRepository::update_state(&self.db, code).await
    }
}

/// Process-local store for single-node development setups
#[derive(Default)]
pub struct MemoryCodeStore {
    codes: Mutex<std::collections::HashMap<String, VerifyCode>>,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> AppResult<std::sync::MutexGuard<'_, std::collections::HashMap<String, VerifyCode>>> {
        self.codes
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("code store lock poisoned")))
    }
}

#[async_trait]
impl CodeStore for MemoryCodeStore {
    async fn save(&self, user: &User, code: &VerifyCode, _ttl: Duration) -> AppResult<()> {
        self.lock()?.insert(cache_key(user), code.clone());
        Ok(())
    }

    async fn load(&self, user: &User) -> AppResult<Option<VerifyCode>> {
        Ok(self.lock()?.get(&cache_key(user)).cloned())
    }

    async fn update(&self, user: &User, code: &VerifyCode) -> AppResult<()> {
        if let Some(entry) = self.lock()?.get_mut(&cache_key(user)) {
            *entry = code.clone();
        }
        Ok(())
    }

    async fn discard(&self, user: &User, _code: &VerifyCode) -> AppResult<()> {
        self.lock()?.remove(&cache_key(user));
        Ok(())
    }
}
