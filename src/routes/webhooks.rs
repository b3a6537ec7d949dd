use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::{
    error::{bad_request, log_internal, ApiError},
    middleware::{extract::ApiJson, webhook::WebhookAuth},
    models::user::IdentityEvent,
    services::{metrics::IDENTITY_WEBHOOKS_COUNTER, users::UserService},
    AppState,
};

/// POST /webhooks/identity: user lifecycle events from the identity provider
pub async fn identity_webhook(
    State(state): State<AppState>,
    _auth: WebhookAuth,
    ApiJson(event): ApiJson<IdentityEvent>,
) -> Result<Json<Value>, ApiError> {
    let message = match event.event_type.as_str() {
        "user.created" => "User created",
        "user.updated" => "User updated",
        _ => {
            IDENTITY_WEBHOOKS_COUNTER.with_label_values(&["unhandled"]).inc();
            return Err(bad_request("Unhandled event type"));
        }
    };
    IDENTITY_WEBHOOKS_COUNTER
        .with_label_values(&[event.event_type.as_str()])
        .inc();

    let upsert = event
        .data
        .to_upsert()
        .ok_or_else(|| bad_request("Event is missing the user id or email address"))?;

    UserService::upsert(&state.db, &upsert)
        .await
        .map_err(|e| log_internal("IDENTITY_WEBHOOK", e))?;
    info!("identity webhook {}: {}", event.event_type, upsert.id);

    Ok(Json(json!({ "message": message })))
}
