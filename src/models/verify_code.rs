//! Confirmation code model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::crypto::{hash_string, verify_hash};

/// An issued confirmation code.
///
/// Only the SHA-256 digest of the code is kept; the plain code leaves the
/// process exactly once, in the confirmation email.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyCode {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub failed_attempts: i32,
    pub is_used: bool,
}

/// Why a supplied code was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CodeRejection {
    #[error("no active confirmation code, request a new one")]
    Missing,
    #[error("confirmation code has already been used")]
    Used,
    #[error("confirmation code has expired")]
    Expired,
    #[error("too many failed attempts, request a new code")]
    Exhausted,
    #[error("confirmation code does not match")]
    Mismatch,
}

impl VerifyCode {
    /// Create a fresh, unused code valid for `ttl`.
    ///
    /// `None` when the expiry falls outside the representable time range.
    pub fn issue(user_id: Uuid, code: &str, now: DateTime<Utc>, ttl: Duration) -> Option<Self> {
        Some(Self {
            id: Uuid::new_v4(),
            user_id,
            code_hash: hash_string(code),
            created_at: now,
            expires_at: now.checked_add_signed(ttl)?,
            failed_attempts: 0,
            is_used: false,
        })
    }

    /// Whether the code could still be redeemed at `now`
    pub fn is_valid(&self, now: DateTime<Utc>, max_attempts: u32) -> bool {
        self.check_state(now, max_attempts).is_ok()
    }

    fn check_state(&self, now: DateTime<Utc>, max_attempts: u32) -> Result<(), CodeRejection> {
        if self.is_used {
            return Err(CodeRejection::Used);
        }
        if now >= self.expires_at {
            return Err(CodeRejection::Expired);
        }
        if self.failed_attempts as i64 >= max_attempts as i64 {
            return Err(CodeRejection::Exhausted);
        }
        Ok(())
    }

    /// Apply one redemption attempt.
    ///
    /// On success the code is marked used. On a mismatch the failure counter
    /// grows; the attempt that reaches `max_attempts` reports `Exhausted`.
    pub fn attempt(
        &mut self,
        supplied: &str,
        now: DateTime<Utc>,
        max_attempts: u32,
    ) -> Result<(), CodeRejection> {
        self.check_state(now, max_attempts)?;

        if verify_hash(supplied.trim(), &self.code_hash) {
            self.is_used = true;
            return Ok(());
        }

        self.failed_attempts += 1;
        if self.failed_attempts as i64 >= max_attempts as i64 {
            Err(CodeRejection::Exhausted)
        } else {
            Err(CodeRejection::Mismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issued(now: DateTime<Utc>) -> VerifyCode {
        VerifyCode::issue(Uuid::new_v4(), "123456", now, Duration::seconds(300)).unwrap()
    }

    #[test]
    fn test_unrepresentable_expiry_is_refused() {
        let ttl = Duration::try_days(365 * 300_000).unwrap();
        let code = VerifyCode::issue(Uuid::new_v4(), "123456", Utc::now(), ttl);
        assert!(code.is_none());
    }

    #[test]
    fn test_code_is_not_stored_in_plain_text() {
        let code = issued(Utc::now());
        assert_ne!(code.code_hash, "123456");
        assert_eq!(code.code_hash.len(), 64);
    }

    #[test]
    fn test_correct_code_is_accepted_once() {
        let now = Utc::now();
        let mut code = issued(now);

        assert_eq!(code.attempt("123456", now, 3), Ok(()));
        assert!(code.is_used);
        assert_eq!(code.attempt("123456", now, 3), Err(CodeRejection::Used));
    }

    #[test]
    fn test_expired_code_is_rejected() {
        let now = Utc::now();
        let mut code = issued(now);
        let later = now + Duration::seconds(301);

        assert!(!code.is_valid(later, 3));
        assert_eq!(code.attempt("123456", later, 3), Err(CodeRejection::Expired));
    }

    #[test]
    fn test_attempt_limit_invalidates_permanently() {
        let now = Utc::now();
        let mut code = issued(now);

        assert_eq!(code.attempt("000000", now, 3), Err(CodeRejection::Mismatch));
        assert_eq!(code.attempt("111111", now, 3), Err(CodeRejection::Mismatch));
        assert_eq!(code.attempt("222222", now, 3), Err(CodeRejection::Exhausted));
        assert_eq!(code.failed_attempts, 3);

        // Even the right code is refused now
        assert_eq!(code.attempt("123456", now, 3), Err(CodeRejection::Exhausted));
        assert!(!code.is_used);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let now = Utc::now();
        let mut code = issued(now);
        assert_eq!(code.attempt(" 123456\n", now, 3), Ok(()));
    }
}
