use serde::{Deserialize, Serialize};

/// Coarse role carried in the identity provider's session token.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    #[default]
    Member,
}

/// Claims of the bearer token issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // provider user id, e.g. "user_2abc..."
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    pub exp: usize,
    pub iat: usize,
}

/// Extracted from the validated token and passed explicitly into every service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
