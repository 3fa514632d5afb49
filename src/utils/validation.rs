//! Input validation utilities
//!
//! Field validators plugged into `#[validate(custom(...))]` on request DTOs.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use regex::Regex;
use validator::ValidationError;

use crate::constants::{FORBIDDEN_USERNAME, MAX_SCORE, MIN_SCORE, SLUG_PATTERN, USERNAME_PATTERN};

static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SLUG_PATTERN).expect("slug pattern is valid"));

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(USERNAME_PATTERN).expect("username pattern is valid"));

fn invalid(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Validate a category/genre slug
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_REGEX.is_match(slug) {
        Ok(())
    } else {
        Err(invalid(
            "slug",
            format!("Slug may only contain characters matching {}", SLUG_PATTERN),
        ))
    }
}

/// Validate username format; `me` is reserved in any letter case
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.eq_ignore_ascii_case(FORBIDDEN_USERNAME) {
        return Err(invalid(
            "forbidden_username",
            format!("Username '{}' is not allowed", username),
        ));
    }
    if !USERNAME_REGEX.is_match(username) {
        return Err(invalid(
            "username",
            "Username may only contain letters, digits and @/./+/-/_",
        ));
    }
    Ok(())
}

/// Validate that a release year is not in the future
pub fn validate_year(year: i32) -> Result<(), ValidationError> {
    if year > Utc::now().year() {
        return Err(invalid("year", "Year cannot be later than the current year"));
    }
    Ok(())
}

/// Validate a review score
pub fn validate_score(score: i16) -> Result<(), ValidationError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(invalid(
            "score",
            format!("Score must be an integer from {} to {}", MIN_SCORE, MAX_SCORE),
        ))
    }
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}
