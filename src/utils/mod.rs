//! Utility functions

pub mod crypto;
pub mod validation;

pub use crypto::generate_confirmation_code;
pub use validation::{
    sanitize_string, validate_score, validate_slug, validate_username, validate_year,
};
