//! Confirmation code issuance and verification

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::{
    config::ConfirmationConfig,
    error::{AppError, AppResult},
    models::{CodeRejection, User, VerifyCode},
    services::code_store::CodeStore,
    utils::generate_confirmation_code,
};

/// Confirmation code service
pub struct ConfirmationService;

impl ConfirmationService {
    /// Issue a new code for `user`, replacing any earlier one.
    ///
    /// Returns the plain code so it can be mailed; only its digest is stored.
    pub async fn generate(
        store: &dyn CodeStore,
        config: &ConfirmationConfig,
        user: &User,
    ) -> AppResult<String> {
        let code = generate_confirmation_code();
        let ttl = i64::try_from(config.ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(ttl_out_of_range)?;
        let entry =
            VerifyCode::issue(user.id, &code, Utc::now(), ttl).ok_or_else(ttl_out_of_range)?;

        store.save(user, &entry, ttl).await?;

        info!(
            user_id = %user.id,
            expires_at = %entry.expires_at,
            "Issued confirmation code"
        );

        Ok(code)
    }

    /// Redeem `code` for `user`. A code is accepted at most once.
    pub async fn verify(
        store: &dyn CodeStore,
        config: &ConfirmationConfig,
        user: &User,
        code: &str,
    ) -> AppResult<User> {
        let Some(mut entry) = store.load(user).await? else {
            return Err(Self::rejected(user, CodeRejection::Missing));
        };

        // The key follows the email; a code issued to a previous owner is void
        if entry.user_id != user.id {
            store.discard(user, &entry).await?;
            return Err(Self::rejected(user, CodeRejection::Missing));
        }

        match entry.attempt(code, Utc::now(), config.max_attempts) {
            Ok(()) => {
                store.discard(user, &entry).await?;
                info!(user_id = %user.id, "Confirmation code accepted");
                Ok(user.clone())
            }
            Err(CodeRejection::Mismatch) => {
                store.update(user, &entry).await?;
                Err(Self::rejected(user, CodeRejection::Mismatch))
            }
            Err(reason) => {
                store.discard(user, &entry).await?;
                Err(Self::rejected(user, reason))
            }
        }
    }

    fn rejected(user: &User, reason: CodeRejection) -> AppError {
        warn!(user_id = %user.id, reason = %reason, "Confirmation code rejected");
        AppError::InvalidConfirmationCode(reason.to_string())
    }
}

fn ttl_out_of_range() -> AppError {
    AppError::Configuration("CONFIRMATION_CODE_TTL_SECONDS is out of range".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::CodeBackend,
        models::{fixtures, Role},
        services::code_store::MemoryCodeStore,
    };

    fn config(max_attempts: u32) -> ConfirmationConfig {
        ConfirmationConfig {
            backend: CodeBackend::Memory,
            ttl_seconds: 300,
            max_attempts,
        }
    }

    fn wrong_code(code: &str) -> String {
        if code == "100000" { "100001" } else { "100000" }.to_string()
    }

    #[tokio::test]
    async fn test_verify_accepts_issued_code_once() {
        let store = MemoryCodeStore::new();
        let cfg = config(3);
        let user = fixtures::user("alice", Role::User);

        let code = ConfirmationService::generate(&store, &cfg, &user).await.unwrap();
        let verified = ConfirmationService::verify(&store, &cfg, &user, &code).await.unwrap();
        assert_eq!(verified.id, user.id);

        let reused = ConfirmationService::verify(&store, &cfg, &user, &code).await;
        assert!(matches!(reused, Err(AppError::InvalidConfirmationCode(_))));
    }

    #[tokio::test]
    async fn test_oversized_ttl_is_a_configuration_error() {
        let store = MemoryCodeStore::new();
        let cfg = ConfirmationConfig {
            ttl_seconds: 10_000_000_000_000,
            ..config(3)
        };
        let user = fixtures::user("carol", Role::User);

        let result = ConfirmationService::generate(&store, &cfg, &user).await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_verify_without_code_fails() {
        let store = MemoryCodeStore::new();
        let user = fixtures::user("bob", Role::User);

        let result = ConfirmationService::verify(&store, &config(3), &user, "123456").await;
        match result {
            Err(AppError::InvalidConfirmationCode(msg)) => {
                assert!(msg.contains("no active confirmation code"))
            }
            other => panic!("unexpected result: {:?}", other.map(|u| u.id)),
        }
    }

    #[tokio::test]
    async fn test_mismatch_keeps_code_until_limit() {
        let store = MemoryCodeStore::new();
        let cfg = config(3);
        let user = fixtures::user("carol", Role::User);

        let code = ConfirmationService::generate(&store, &cfg, &user).await.unwrap();
        let bad = wrong_code(&code);

        assert!(ConfirmationService::verify(&store, &cfg, &user, &bad).await.is_err());
        assert_eq!(store.load(&user).await.unwrap().unwrap().failed_attempts, 1);

        // Still redeemable after a single miss
        assert!(ConfirmationService::verify(&store, &cfg, &user, &code).await.is_ok());
    }

    #[tokio::test]
    async fn test_exhausted_code_is_discarded() {
        let store = MemoryCodeStore::new();
        let cfg = config(2);
        let user = fixtures::user("dave", Role::User);

        let code = ConfirmationService::generate(&store, &cfg, &user).await.unwrap();
        let bad = wrong_code(&code);

        assert!(ConfirmationService::verify(&store, &cfg, &user, &bad).await.is_err());
        assert!(ConfirmationService::verify(&store, &cfg, &user, &bad).await.is_err());
        assert!(store.load(&user).await.unwrap().is_none());

        assert!(ConfirmationService::verify(&store, &cfg, &user, &code).await.is_err());
    }

    #[tokio::test]
    async fn test_new_code_supersedes_previous() {
        let store = MemoryCodeStore::new();
        let cfg = config(3);
        let user = fixtures::user("erin", Role::User);

        let first = ConfirmationService::generate(&store, &cfg, &user).await.unwrap();
        let second = ConfirmationService::generate(&store, &cfg, &user).await.unwrap();

        if first != second {
            assert!(ConfirmationService::verify(&store, &cfg, &user, &first).await.is_err());
        }
        assert!(ConfirmationService::verify(&store, &cfg, &user, &second).await.is_ok());
    }

    #[tokio::test]
    async fn test_code_of_previous_email_owner_is_void() {
        let store = MemoryCodeStore::new();
        let cfg = config(3);
        let old_owner = fixtures::user("frank", Role::User);
        let mut new_owner = fixtures::user("grace", Role::User);
        new_owner.email = old_owner.email.clone();

        let code = ConfirmationService::generate(&store, &cfg, &old_owner).await.unwrap();
        assert!(ConfirmationService::verify(&store, &cfg, &new_owner, &code).await.is_err());
    }
}
