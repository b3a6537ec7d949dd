use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Local mirror of an identity-provider account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Avatar {
    pub image_url: Option<String>,
}

/// Envelope of an identity-provider webhook delivery.
#[derive(Debug, Deserialize)]
pub struct IdentityEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: IdentityUserData,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdentityUserData {
    pub id: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

/// Validated user fields carried by `user.created` / `user.updated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpsert {
    pub id: String,
    pub email: String,
    pub image_url: Option<String>,
}

impl IdentityUserData {
    /// The first email address is the primary one.
    pub fn to_upsert(&self) -> Option<UserUpsert> {
        let id = self.id.as_deref().filter(|s| !s.is_empty())?;
        let email = self.email_addresses.first()?.email_address.trim();
        if email.is_empty() {
            return None;
        }
        Some(UserUpsert {
            id: id.to_string(),
            email: email.to_string(),
            image_url: self.image_url.clone().filter(|s| !s.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_event_yields_primary_email() {
        let event: IdentityEvent = serde_json::from_value(serde_json::json!({
            "type": "user.created",
            "data": {
                "id": "user_123",
                "email_addresses": [
                    { "email_address": "cook@example.com" },
                    { "email_address": "other@example.com" }
                ],
                "image_url": "https://img.example.com/u.png"
            }
        }))
        .unwrap();
        assert_eq!(event.event_type, "user.created");
        let upsert = event.data.to_upsert().unwrap();
        assert_eq!(upsert.id, "user_123");
        assert_eq!(upsert.email, "cook@example.com");
        assert_eq!(upsert.image_url.as_deref(), Some("https://img.example.com/u.png"));
    }

    #[test]
    fn events_without_email_are_rejected() {
        let event: IdentityEvent = serde_json::from_value(serde_json::json!({
            "type": "user.updated",
            "data": { "id": "user_123", "email_addresses": [] }
        }))
        .unwrap();
        assert!(event.data.to_upsert().is_none());
    }

    #[test]
    fn data_may_be_absent_for_unrelated_events() {
        let event: IdentityEvent =
            serde_json::from_value(serde_json::json!({ "type": "session.created" })).unwrap();
        assert!(event.data.to_upsert().is_none());
    }
}
