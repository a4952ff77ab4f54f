//! Token issuing for allow-listed operators
//!
//! Identity verification happens outside this system; what arrives here is a
//! verified email and display name, exchanged for an app token only when the
//! email is on the operator allow-list.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::{AppError, AppResult};

/// Auth service issuing app tokens
#[derive(Clone)]
pub struct AuthService {
    auth_config: AuthConfig,
}

/// Token claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

/// Issued token response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl AuthService {
    pub fn new(auth_config: AuthConfig) -> Self {
        Self { auth_config }
    }

    /// Exchange a verified identity for an app token
    pub fn issue_token(&self, email: &str, name: &str) -> AppResult<TokenResponse> {
        let email = email.trim().to_lowercase();
        if !self.auth_config.is_allowed(&email) {
            tracing::warn!("Rejected token request for {}", email);
            return Err(AppError::NotAllowed(email));
        }

        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.auth_config.token_expiry);

        let claims = Claims {
            sub: email,
            name: name.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.auth_config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.auth_config.token_expiry,
        })
    }
}
