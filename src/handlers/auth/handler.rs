//! Authentication handler implementations

use axum::{extract::State, Json};
use validator::Validate;

use crate::{error::AppResult, services::AuthService, state::AppState};

use super::{
    request::{SignupRequest, TokenRequest},
    response::{SignupResponse, TokenResponse},
};

/// Register (or re-register) and mail a confirmation code
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    payload.validate()?;

    let outcome = AuthService::signup(
        state.db(),
        state.codes(),
        state.mailer(),
        state.config(),
        &payload.username,
        &payload.email,
    )
    .await?;

    Ok(Json(SignupResponse {
        email: outcome.user.email,
        username: outcome.user.username,
        mail_error: outcome.mail_error,
    }))
}

/// Exchange a confirmation code for an access token
pub async fn token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    payload.validate()?;

    let token = AuthService::issue_token(
        state.db(),
        state.codes(),
        state.config(),
        &payload.username,
        &payload.confirmation_code,
    )
    .await?;

    Ok(Json(TokenResponse { token }))
}
