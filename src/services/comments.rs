use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::ServiceError, models::comment::Comment};

pub const MAX_COMMENT_CHARS: usize = 2000;

pub struct CommentService;

impl CommentService {
    /// Post a comment on a recipe and return the recipe's comments, newest first.
    pub async fn create_for_recipe(
        pool: &PgPool,
        recipe_id: Uuid,
        user_id: &str,
        text: &str,
    ) -> Result<Vec<Comment>, ServiceError> {
        sqlx::query("INSERT INTO comments (text, user_id, recipe_id) VALUES ($1, $2, $3)")
            .bind(text)
            .bind(user_id)
            .bind(recipe_id)
            .execute(pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    ServiceError::NotFound("Recipe")
                }
                _ => e.into(),
            })?;

        Self::list_for_recipe(pool, recipe_id).await
    }

    pub async fn list_for_recipe(pool: &PgPool, recipe_id: Uuid) -> Result<Vec<Comment>, ServiceError> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT id, text, user_id, recipe_id, article_id, created_at
             FROM comments
             WHERE recipe_id = $1
             ORDER BY created_at DESC, id",
        )
        .bind(recipe_id)
        .fetch_all(pool)
        .await?;
        Ok(comments)
    }
}

/// Trimmed comment text, or a validation error when blank or too long.
pub fn validate_comment_text(raw: Option<&str>) -> Result<String, ServiceError> {
    let text = raw.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(ServiceError::Validation("Invalid comment text".into()));
    }
    if text.chars().count() > MAX_COMMENT_CHARS {
        return Err(ServiceError::Validation(format!(
            "Comments are limited to {MAX_COMMENT_CHARS} characters"
        )));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_or_missing_text_is_invalid() {
        assert!(validate_comment_text(None).is_err());
        assert!(validate_comment_text(Some("   \n")).is_err());
    }

    #[test]
    fn text_is_trimmed() {
        assert_eq!(
            validate_comment_text(Some("  Lovely soup ")).unwrap(),
            "Lovely soup"
        );
    }

    #[test]
    fn overly_long_text_is_rejected() {
        let long = "a".repeat(MAX_COMMENT_CHARS + 1);
        assert!(validate_comment_text(Some(&long)).is_err());
        let max = "é".repeat(MAX_COMMENT_CHARS);
        assert!(validate_comment_text(Some(&max)).is_ok());
    }
}
