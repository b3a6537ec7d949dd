use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::comment::Comment;

#[derive(Debug, Clone, FromRow)]
pub struct ArticleRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

/// tag_articles ⋈ tags.
#[derive(Debug, Clone, FromRow)]
pub struct TagArticleRow {
    pub article_id: Uuid,
    pub tag_id: Uuid,
    pub tag_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagArticle {
    pub tag: Tag,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<TagArticle>,
    pub comments: Vec<Comment>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            text: row.text,
            created_at: row.created_at,
            tags: Vec::new(),
            comments: Vec::new(),
        }
    }
}
