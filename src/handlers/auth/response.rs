//! Authentication response DTOs

use serde::Serialize;

/// Sign-up response, echoing the registered pair
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub email: String,
    pub username: String,

    /// Present when the confirmation email could not be delivered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail_error: Option<String>,
}

/// Access token response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
