use axum::{extract::FromRequestParts, http::request::Parts, http::StatusCode};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::{
    error::{error_response, ApiError},
    models::auth::{AuthenticatedUser, Claims},
};

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "Missing Authorization header"))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            error_response(StatusCode::UNAUTHORIZED, "Invalid Authorization header format")
        })?;

        let secret = parts.extensions.get::<JwtSecret>().ok_or_else(|| {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "JWT secret not configured")
        })?;

        decode_session_token(token, &secret.0)
            .map_err(|_| error_response(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
    }
}

/// Extension type to carry the JWT secret through request extensions.
#[derive(Clone)]
pub struct JwtSecret(pub String);

/// Validate an identity-provider session token and extract the caller.
pub fn decode_session_token(token: &str, secret: &str) -> anyhow::Result<AuthenticatedUser> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &key, &validation)?;
    let claims = data.claims;
    anyhow::ensure!(!claims.sub.trim().is_empty(), "token has an empty subject");

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        role: claims.role.unwrap_or_default(),
    })
}
