//! YaMDb - media review platform API
//!
//! This library provides the core functionality for the YaMDb service:
//! titles grouped by category and genre, user reviews with a derived
//! rating, comments on reviews, and email-confirmed token authentication.
//!
//! # Features
//!
//! - Confirmation codes with expiry, single use and an attempt limit
//! - Role-based access control (user, moderator, admin)
//! - Title rating recomputed in the same transaction as every review change
//! - Limit/offset pagination and filtering on list endpoints
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Permissions**: Pure allow/deny predicates
//! - **Services**: Business logic
//! - **Repositories**: Database access
//! - **Models**: Domain models and row types

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod permissions;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
