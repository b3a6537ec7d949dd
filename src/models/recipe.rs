use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{
    catalog::{Category, Ingredient, Tool},
    comment::Comment,
};

/// recipes ⋈ categories, one row per recipe.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: Uuid,
    pub title: String,
    pub preparation_time: i32,
    pub difficulty: i16,
    pub instructions: String,
    pub image: Option<String>,
    pub is_healthy: bool,
    pub is_vegan: bool,
    pub created_at: DateTime<Utc>,
    pub category_id: Uuid,
    pub category_name: String,
}

/// compositions ⋈ ingredients.
#[derive(Debug, Clone, FromRow)]
pub struct CompositionRow {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub quantity: f64,
    pub measure_unity: String,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub ingredient_image: Option<String>,
}

/// tool_recipes ⋈ tools.
#[derive(Debug, Clone, FromRow)]
pub struct ToolRecipeRow {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub tool_id: Uuid,
    pub tool_name: String,
    pub tool_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub id: Uuid,
    pub quantity: f64,
    pub measure_unity: String,
    pub ingredient: Ingredient,
}

impl From<CompositionRow> for Composition {
    fn from(row: CompositionRow) -> Self {
        Self {
            id: row.id,
            quantity: row.quantity,
            measure_unity: row.measure_unity,
            ingredient: Ingredient {
                id: row.ingredient_id,
                name: row.ingredient_name,
                image: row.ingredient_image,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRecipe {
    pub id: Uuid,
    pub tool: Tool,
}

impl From<ToolRecipeRow> for ToolRecipe {
    fn from(row: ToolRecipeRow) -> Self {
        Self {
            id: row.id,
            tool: Tool {
                id: row.tool_id,
                name: row.tool_name,
                image: row.tool_image,
            },
        }
    }
}

/// A recipe with category, compositions, tools and comments expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub preparation_time: i32,
    pub difficulty: i16,
    pub instructions: String,
    pub image: Option<String>,
    pub is_healthy: bool,
    pub is_vegan: bool,
    pub created_at: DateTime<Utc>,
    pub category: Category,
    pub compositions: Vec<Composition>,
    pub tools_recipe: Vec<ToolRecipe>,
    pub comments: Vec<Comment>,
}

impl Recipe {
    pub fn from_row(row: RecipeRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            preparation_time: row.preparation_time,
            difficulty: row.difficulty,
            instructions: row.instructions,
            image: row.image,
            is_healthy: row.is_healthy,
            is_vegan: row.is_vegan,
            created_at: row.created_at,
            category: Category {
                id: row.category_id,
                name: row.category_name,
            },
            compositions: Vec::new(),
            tools_recipe: Vec::new(),
            comments: Vec::new(),
        }
    }
}

/// Query params for GET /recipe/category.
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

/// Query params for GET /search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}
