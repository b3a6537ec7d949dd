use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    article::{Article, ArticleRow, Tag, TagArticle, TagArticleRow},
    comment::Comment,
};

pub struct ArticleService;

impl ArticleService {
    /// All articles, newest first, with tags and comments.
    pub async fn list(pool: &PgPool) -> anyhow::Result<Vec<Article>> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            "SELECT id, title, slug, text, created_at FROM articles ORDER BY created_at DESC, id",
        )
        .fetch_all(pool)
        .await?;
        expand(pool, rows).await
    }

    pub async fn get_by_slug(pool: &PgPool, slug: &str) -> anyhow::Result<Option<Article>> {
        let row = sqlx::query_as::<_, ArticleRow>(
            "SELECT id, title, slug, text, created_at FROM articles WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await?;
        match row {
            Some(row) => Ok(expand(pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

async fn expand(pool: &PgPool, rows: Vec<ArticleRow>) -> anyhow::Result<Vec<Article>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

    let tags = sqlx::query_as::<_, TagArticleRow>(
        "SELECT ta.article_id, t.id AS tag_id, t.name AS tag_name
         FROM tag_articles ta
         JOIN tags t ON t.id = ta.tag_id
         WHERE ta.article_id = ANY($1)
         ORDER BY t.name",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let comments = sqlx::query_as::<_, Comment>(
        "SELECT id, text, user_id, recipe_id, article_id, created_at
         FROM comments
         WHERE article_id = ANY($1)
         ORDER BY created_at DESC, id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut articles: Vec<Article> = rows.into_iter().map(Article::from).collect();
    let index: HashMap<Uuid, usize> = articles
        .iter()
        .enumerate()
        .map(|(i, a)| (a.id, i))
        .collect();

    for row in tags {
        if let Some(&i) = index.get(&row.article_id) {
            articles[i].tags.push(TagArticle {
                tag: Tag {
                    id: row.tag_id,
                    name: row.tag_name,
                },
            });
        }
    }
    for comment in comments {
        if let Some(i) = comment.article_id.and_then(|id| index.get(&id).copied()) {
            articles[i].comments.push(comment);
        }
    }
    Ok(articles)
}
