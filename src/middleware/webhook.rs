use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use crate::{
    error::{error_response, ApiError},
    AppState,
};

/// Extractor that validates the `X-Webhook-Secret` header against `config.webhook_secret`.
pub struct WebhookAuth;

impl FromRequestParts<AppState> for WebhookAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let secret = parts
            .headers
            .get("X-Webhook-Secret")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "Missing X-Webhook-Secret header"))?;

        if !secrets_match(secret, &state.config.webhook_secret) {
            tracing::warn!("identity webhook rejected: bad secret");
            return Err(error_response(StatusCode::UNAUTHORIZED, "Invalid webhook secret"));
        }

        Ok(WebhookAuth)
    }
}

/// Constant-time comparison: the time taken depends only on the lengths.
fn secrets_match(given: &str, expected: &str) -> bool {
    let (given, expected) = (given.as_bytes(), expected.as_bytes());
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
