//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Largest accepted request body
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Longest accepted JWT lifetime in hours (one year)
pub const MAX_JWT_EXPIRY_HOURS: i64 = 24 * 365;

/// Default confirmation code lifetime in seconds
pub const DEFAULT_CONFIRMATION_CODE_TTL_SECONDS: u64 = 300;

/// Longest accepted confirmation code lifetime in seconds (one week)
pub const MAX_CONFIRMATION_CODE_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Default number of failed attempts before a code is invalidated
pub const DEFAULT_CONFIRMATION_MAX_ATTEMPTS: u32 = 3;

/// Confirmation code bounds (6 digits)
pub const CONFIRMATION_CODE_MIN: u32 = 100_000;
pub const CONFIRMATION_CODE_MAX: u32 = 999_999;

/// Redis key prefix for confirmation codes
pub const CONFIRMATION_CODE_KEY_PREFIX: &str = "confirmation_code_";

/// Username that can never be registered (clashes with `/users/me`)
pub const FORBIDDEN_USERNAME: &str = "me";

/// Username maximum length
pub const MAX_USERNAME_LENGTH: u64 = 150;

/// Email maximum length
pub const MAX_EMAIL_LENGTH: u64 = 254;

/// First/last name maximum length
pub const MAX_PERSON_NAME_LENGTH: u64 = 150;

// =============================================================================
// EMAIL DEFAULTS
// =============================================================================

/// Default sender address
pub const DEFAULT_EMAIL_FROM: &str = "noreply@yamdb.local";

/// Default SMTP submission port
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Subject of the confirmation email
pub const CONFIRMATION_EMAIL_SUBJECT: &str = "Confirmation code";

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers
pub mod roles {
    pub const USER: &str = "user";
    pub const MODERATOR: &str = "moderator";
    pub const ADMIN: &str = "admin";

    /// All user roles
    pub const ALL: &[&str] = &[USER, MODERATOR, ADMIN];
}

// =============================================================================
// CATALOGUE
// =============================================================================

/// Maximum length of category, genre and title names
pub const MAX_NAME_LENGTH: u64 = 256;

/// Maximum slug length
pub const MAX_SLUG_LENGTH: u64 = 50;

/// Allowed slug pattern
pub const SLUG_PATTERN: &str = r"^[-a-zA-Z0-9_]+$";

/// Allowed username pattern (letters, digits and `@.+-_`)
pub const USERNAME_PATTERN: &str = r"^[\w.@+-]+$";

/// Review score bounds
pub const MIN_SCORE: i16 = 1;
pub const MAX_SCORE: i16 = 10;

// =============================================================================
// API VERSIONING
// =============================================================================

/// Current API version
pub const API_VERSION: &str = "v1";

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Rate limiting configuration
pub mod rate_limits {
    /// Auth endpoint - max requests
    pub const AUTH_MAX_REQUESTS: i64 = 5;
    /// Auth endpoint - window in seconds
    pub const AUTH_WINDOW_SECS: i64 = 60;

    /// General API - max requests
    pub const GENERAL_MAX_REQUESTS: i64 = 100;
    /// General API - window in seconds
    pub const GENERAL_WINDOW_SECS: i64 = 60;
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for paginated results
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum page size for paginated results
pub const MAX_PAGE_SIZE: u32 = 100;
