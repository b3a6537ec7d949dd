use sqlx::PgPool;

use crate::models::catalog::{Category, Ingredient, Tool};

pub struct CatalogService;

impl CatalogService {
    pub async fn list_categories(pool: &PgPool) -> anyhow::Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
            .fetch_all(pool)
            .await?;
        Ok(categories)
    }

    pub async fn list_ingredients(pool: &PgPool) -> anyhow::Result<Vec<Ingredient>> {
        let ingredients =
            sqlx::query_as::<_, Ingredient>("SELECT id, name, image FROM ingredients ORDER BY name")
                .fetch_all(pool)
                .await?;
        Ok(ingredients)
    }

    pub async fn list_tools(pool: &PgPool) -> anyhow::Result<Vec<Tool>> {
        let tools = sqlx::query_as::<_, Tool>("SELECT id, name, image FROM tools ORDER BY name")
            .fetch_all(pool)
            .await?;
        Ok(tools)
    }
}
