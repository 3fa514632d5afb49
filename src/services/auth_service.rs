//! Authentication service
//!
//! Sign-up issues a confirmation code by email; the code is later exchanged
//! for a bearer token. There are no passwords.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::{
    config::{Config, JwtConfig},
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::{NewUser, Role, User},
    services::{
        code_store::CodeStore,
        confirmation_service::ConfirmationService,
        email_service::{EmailSender, EmailService},
    },
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub username: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// Result of a sign-up request
#[derive(Debug)]
pub struct SignupOutcome {
    pub user: User,
    /// Delivery failure, if the confirmation email could not be sent
    pub mail_error: Option<String>,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Register `username`/`email`, or re-issue a code for an existing pair
    pub async fn signup(
        pool: &PgPool,
        codes: &dyn CodeStore,
        mailer: &dyn EmailSender,
        config: &Config,
        username: &str,
        email: &str,
    ) -> AppResult<SignupOutcome> {
        let email = email.trim().to_lowercase();

        let by_username = UserRepository::find_by_username(pool, username).await?;
        let by_email = UserRepository::find_by_email(pool, &email).await?;

        let user = match (by_username, by_email) {
            (Some(a), Some(b)) if a.id == b.id => a,
            (Some(_), _) => {
                return Err(AppError::field(
                    "username",
                    "This username is registered with a different email",
                ));
            }
            (None, Some(_)) => {
                return Err(AppError::field(
                    "email",
                    "This email is registered with a different username",
                ));
            }
            (None, None) => {
                let new = NewUser {
                    username: username.to_string(),
                    email: email.clone(),
                    ..NewUser::default()
                };
                let user = UserRepository::create(pool, &new).await.map_err(|e| match e {
                    // Lost a race with a concurrent sign-up
                    AppError::AlreadyExists(_) => {
                        AppError::field("username", "A user with this username or email already exists")
                    }
                    other => other,
                })?;
                info!(user_id = %user.id, username = %user.username, "User signed up");
                user
            }
        };

        let code = ConfirmationService::generate(codes, &config.confirmation, &user).await?;
        let mail_error = EmailService::send_confirmation_code(mailer, &code, &user.email)
            .await
            .err()
            .map(|e| e.0);

        Ok(SignupOutcome { user, mail_error })
    }

    /// Exchange a confirmation code for an access token
    pub async fn issue_token(
        pool: &PgPool,
        codes: &dyn CodeStore,
        config: &Config,
        username: &str,
        confirmation_code: &str,
    ) -> AppResult<String> {
        let user = UserRepository::find_by_username(pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let user =
            ConfirmationService::verify(codes, &config.confirmation, &user, confirmation_code)
                .await?;

        let token = Self::create_token(&user, &config.jwt)?;
        info!(user_id = %user.id, username = %user.username, "Access token issued");

        Ok(token)
    }

    /// Verify JWT token and extract claims
    pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Generate access token
    pub fn create_token(user: &User, jwt: &JwtConfig) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = Duration::try_hours(jwt.expiry_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::Configuration("JWT_EXPIRY_HOURS is out of range".to_string())
            })?;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;

    fn jwt(expiry_hours: i64) -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiry_hours,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let user = fixtures::user("critic", Role::Moderator);
        let token = AuthService::create_token(&user, &jwt(24)).unwrap();

        let claims = AuthService::verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "critic");
        assert_eq!(claims.role, Role::Moderator);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_with_wrong_secret_is_invalid() {
        let user = fixtures::user("critic", Role::User);
        let token = AuthService::create_token(&user, &jwt(24)).unwrap();

        let result = AuthService::verify_token(&token, "another-secret");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_expired_token() {
        let user = fixtures::user("critic", Role::User);
        let token = AuthService::create_token(&user, &jwt(-2)).unwrap();

        let result = AuthService::verify_token(&token, "test-secret");
        assert!(matches!(result, Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_oversized_expiry_is_a_configuration_error() {
        let user = fixtures::user("alice", Role::User);
        let result = AuthService::create_token(&user, &jwt(i64::MAX));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_garbage_token() {
        let result = AuthService::verify_token("not.a.jwt", "test-secret");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }
}
