//! Authentication middleware
//!
//! Validates bearer tokens carrying an externally-verified identity and
//! gates every core route behind the operator allow-list.

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorResponse;

/// Authenticated operator extracted from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: String,
    pub name: String,
}

/// Authentication middleware that validates bearer tokens.
/// Note: token validation is done inline against the environment-provided
/// secret to avoid state dependency issues; the allow-list is read the same
/// way.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    // Decode and validate the token
    let jwt_secret = std::env::var("FSP__AUTH__JWT_SECRET")
        .or_else(|_| std::env::var("FSP_JWT_SECRET"))
        .unwrap_or_else(|_| "development-secret-key".to_string());

    let claims = match decode_jwt(token, &jwt_secret) {
        Ok(claims) => claims,
        Err(msg) => {
            return unauthorized_response(&msg);
        }
    };

    // Gate on the operator allow-list
    let email = claims.sub.trim().to_lowercase();
    if !allow_list_from_env().iter().any(|e| *e == email) {
        return forbidden_response(&email);
    }

    // Create AuthUser and insert into request extensions
    let auth_user = AuthUser {
        email,
        name: claims.name,
    };

    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

/// Token claims structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Claims {
    sub: String,
    name: String,
    exp: i64,
    iat: i64,
}

/// Decode and validate a bearer token
fn decode_jwt(token: &str, secret: &str) -> Result<Claims, String> {
    use jsonwebtoken::{decode, DecodingKey, Validation};

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

/// Read the operator allow-list (comma-separated emails)
fn allow_list_from_env() -> Vec<String> {
    std::env::var("FSP__AUTH__ALLOWED_USERS")
        .or_else(|_| std::env::var("FSP_ALLOWED_USERS"))
        .unwrap_or_default()
        .split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Create unauthorized response
fn unauthorized_response(message: &str) -> Response {
    let error = ErrorResponse {
        error: crate::error::ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message_en: message.to_string(),
            message_zh: "尚未登入或憑證無效".to_string(),
            field: None,
        },
    };

    (StatusCode::UNAUTHORIZED, Json(error)).into_response()
}

/// Create forbidden response for identities outside the allow-list
fn forbidden_response(email: &str) -> Response {
    let error = ErrorResponse {
        error: crate::error::ErrorDetail {
            code: "FORBIDDEN".to_string(),
            message_en: format!("Account {} is not authorized to use this system", email),
            message_zh: format!("帳號 {} 未獲授權使用本系統", email),
            field: None,
        },
    };

    (StatusCode::FORBIDDEN, Json(error)).into_response()
}

/// Extractor for the authenticated operator
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: crate::error::ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message_en: "Authentication required".to_string(),
                        message_zh: "請先登入系統".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}
