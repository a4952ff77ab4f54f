//! Authentication handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::auth::{AuthService, TokenResponse};
use crate::AppState;

/// Token request carrying an externally-verified identity
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

/// Exchange a verified identity for an app token (allow-list gated)
pub async fn issue_token(
    State(state): State<AppState>,
    Json(input): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    input
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let service = AuthService::new(state.config.auth.clone());
    let token = service.issue_token(&input.email, &input.name)?;
    Ok(Json(token))
}
