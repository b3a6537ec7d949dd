use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A comment on either a recipe or an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub user_id: String,
    pub recipe_id: Option<Uuid>,
    pub article_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Body for POST /recipe/{id}/comments.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: Option<String>,
}
