//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::constants::{
    DEFAULT_CONFIRMATION_CODE_TTL_SECONDS, DEFAULT_CONFIRMATION_MAX_ATTEMPTS,
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_EMAIL_FROM, DEFAULT_JWT_EXPIRY_HOURS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SMTP_PORT,
    MAX_CONFIRMATION_CODE_TTL_SECONDS, MAX_JWT_EXPIRY_HOURS,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub confirmation: ConfirmationConfig,
    pub email: EmailConfig,
    pub bootstrap: BootstrapConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// JWT authentication configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
}

/// Where issued confirmation codes are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeBackend {
    /// Short-lived Redis entry
    Cache,
    /// `verify_codes` table
    Database,
    /// Process-local map, lost on restart
    Memory,
}

impl FromStr for CodeBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cache" | "redis" => Ok(Self::Cache),
            "database" | "db" => Ok(Self::Database),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidValue(
                "CONFIRMATION_CODE_BACKEND".to_string(),
            )),
        }
    }
}

/// Confirmation code settings
#[derive(Debug, Clone)]
pub struct ConfirmationConfig {
    pub backend: CodeBackend,
    /// Code lifetime in seconds
    pub ttl_seconds: u64,
    /// Failed attempts tolerated before the code is discarded
    pub max_attempts: u32,
}

/// Outgoing mail transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailBackend {
    Console,
    Smtp,
}

impl FromStr for EmailBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "smtp" => Ok(Self::Smtp),
            _ => Err(ConfigError::InvalidValue("EMAIL_BACKEND".to_string())),
        }
    }
}

/// Email delivery configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub backend: EmailBackend,
    pub from: String,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
}

/// Superuser ensured at startup, if configured
#[derive(Debug, Clone, Default)]
pub struct BootstrapConfig {
    pub admin_username: Option<String>,
    pub admin_email: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            confirmation: ConfirmationConfig::from_env()?,
            email: EmailConfig::from_env()?,
            bootstrap: BootstrapConfig::from_env(),
        })
    }
}

/// Read an optional variable and parse it, falling back to `default`
fn parse_or<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_or("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            )?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
            expiry_hours: parse_or("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_JWT_EXPIRY_HOURS).contains(&self.expiry_hours) {
            return Err(ConfigError::InvalidValue("JWT_EXPIRY_HOURS".to_string()));
        }
        Ok(())
    }
}

impl ConfirmationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            backend: parse_or("CONFIRMATION_CODE_BACKEND", CodeBackend::Cache)?,
            ttl_seconds: parse_or(
                "CONFIRMATION_CODE_TTL_SECONDS",
                DEFAULT_CONFIRMATION_CODE_TTL_SECONDS,
            )?,
            max_attempts: parse_or(
                "CONFIRMATION_MAX_ATTEMPTS",
                DEFAULT_CONFIRMATION_MAX_ATTEMPTS,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_CONFIRMATION_CODE_TTL_SECONDS).contains(&self.ttl_seconds) {
            return Err(ConfigError::InvalidValue(
                "CONFIRMATION_CODE_TTL_SECONDS".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "CONFIRMATION_MAX_ATTEMPTS".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            backend: CodeBackend::Cache,
            ttl_seconds: DEFAULT_CONFIRMATION_CODE_TTL_SECONDS,
            max_attempts: DEFAULT_CONFIRMATION_MAX_ATTEMPTS,
        }
    }
}

impl EmailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            backend: parse_or("EMAIL_BACKEND", EmailBackend::Console)?,
            from: env::var("EMAIL_FROM").unwrap_or_else(|_| DEFAULT_EMAIL_FROM.to_string()),
            smtp_host: optional("SMTP_HOST"),
            smtp_port: parse_or("SMTP_PORT", DEFAULT_SMTP_PORT)?,
            smtp_username: optional("SMTP_USERNAME"),
            smtp_password: optional("SMTP_PASSWORD"),
        };

        if config.backend == EmailBackend::Smtp && config.smtp_host.is_none() {
            return Err(ConfigError::Missing("SMTP_HOST".to_string()));
        }

        Ok(config)
    }
}

impl BootstrapConfig {
    fn from_env() -> Self {
        Self {
            admin_username: optional("BOOTSTRAP_ADMIN_USERNAME"),
            admin_email: optional("BOOTSTRAP_ADMIN_EMAIL"),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            rust_log: "info".to_string(),
        };
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);

        let confirmation = ConfirmationConfig::default();
        assert_eq!(confirmation.backend, CodeBackend::Cache);
        assert_eq!(confirmation.ttl_seconds, 300);
        assert_eq!(confirmation.max_attempts, 3);
    }

    #[test]
    fn test_code_backend_parsing() {
        assert_eq!("cache".parse::<CodeBackend>().unwrap(), CodeBackend::Cache);
        assert_eq!("Redis".parse::<CodeBackend>().unwrap(), CodeBackend::Cache);
        assert_eq!(
            "database".parse::<CodeBackend>().unwrap(),
            CodeBackend::Database
        );
        assert_eq!("memory".parse::<CodeBackend>().unwrap(), CodeBackend::Memory);
        assert!("memcached".parse::<CodeBackend>().is_err());
    }

    #[test]
    fn test_email_backend_parsing() {
        assert_eq!("smtp".parse::<EmailBackend>().unwrap(), EmailBackend::Smtp);
        assert_eq!(
            "CONSOLE".parse::<EmailBackend>().unwrap(),
            EmailBackend::Console
        );
        assert!("sendmail".parse::<EmailBackend>().is_err());
    }

    #[test]
    fn test_confirmation_ttl_bounds() {
        let mut confirmation = ConfirmationConfig::default();
        assert!(confirmation.validate().is_ok());

        confirmation.ttl_seconds = MAX_CONFIRMATION_CODE_TTL_SECONDS;
        assert!(confirmation.validate().is_ok());

        for ttl in [0, MAX_CONFIRMATION_CODE_TTL_SECONDS + 1, 10_000_000_000_000] {
            confirmation.ttl_seconds = ttl;
            assert!(matches!(
                confirmation.validate(),
                Err(ConfigError::InvalidValue(name)) if name == "CONFIRMATION_CODE_TTL_SECONDS"
            ));
        }
    }

    #[test]
    fn test_jwt_expiry_bounds() {
        let mut jwt = JwtConfig {
            secret: "secret".to_string(),
            expiry_hours: DEFAULT_JWT_EXPIRY_HOURS,
        };
        assert!(jwt.validate().is_ok());

        for hours in [0, -1, MAX_JWT_EXPIRY_HOURS + 1, i64::MAX] {
            jwt.expiry_hours = hours;
            assert!(jwt.validate().is_err());
        }
    }
}
