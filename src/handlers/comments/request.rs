//! Comment request DTOs

use serde::Deserialize;
use validator::Validate;

/// Create or update comment request
#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1))]
    pub text: String,
}
