use std::collections::HashMap;

use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    comment::Comment,
    recipe::{Composition, CompositionRow, Recipe, RecipeRow, ToolRecipe, ToolRecipeRow},
};

const RECIPE_SELECT: &str = r#"SELECT r.id, r.title, r.preparation_time, r.difficulty, r.instructions,
                  r.image, r.is_healthy, r.is_vegan, r.created_at,
                  c.id AS category_id, c.name AS category_name
           FROM recipes r
           JOIN categories c ON c.id = r.category_id"#;

/// How many recipes the suggestion endpoint returns at most.
pub const SUGGESTION_COUNT: i64 = 3;

pub struct RecipeService;

impl RecipeService {
    /// Every recipe, newest first.
    pub async fn list(pool: &PgPool) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "{RECIPE_SELECT} ORDER BY r.created_at DESC, r.id"
        ))
        .fetch_all(pool)
        .await?;
        expand(pool, rows).await
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!("{RECIPE_SELECT} WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        match row {
            Some(row) => Ok(expand(pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Recipes whose category name matches case-insensitively, newest first.
    pub async fn list_by_category_name(pool: &PgPool, name: &str) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "{RECIPE_SELECT} WHERE LOWER(c.name) = LOWER($1) ORDER BY r.created_at DESC, r.id"
        ))
        .bind(name)
        .fetch_all(pool)
        .await?;
        expand(pool, rows).await
    }

    /// Case-insensitive substring search on the title.
    pub async fn search(pool: &PgPool, query: &str) -> anyhow::Result<Vec<Recipe>> {
        let pattern = format!("%{}%", escape_like(query));
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "{RECIPE_SELECT} WHERE r.title ILIKE $1 ORDER BY r.title, r.id"
        ))
        .bind(pattern)
        .fetch_all(pool)
        .await?;
        expand(pool, rows).await
    }

    /// Up to [`SUGGESTION_COUNT`] recipes from the same category, excluding `current_id`,
    /// taken as a contiguous window at a random offset.
    pub async fn suggestions(
        pool: &PgPool,
        category_id: Uuid,
        current_id: Uuid,
    ) -> anyhow::Result<Vec<Recipe>> {
        let available: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM recipes WHERE category_id = $1 AND id <> $2",
        )
        .bind(category_id)
        .bind(current_id)
        .fetch_one(pool)
        .await?;

        let Some(window) = suggestion_window(available, &mut rand::thread_rng()) else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "{RECIPE_SELECT}
             WHERE r.category_id = $1 AND r.id <> $2
             ORDER BY r.created_at, r.id
             LIMIT $3 OFFSET $4"
        ))
        .bind(category_id)
        .bind(current_id)
        .bind(window.take)
        .bind(window.skip)
        .fetch_all(pool)
        .await?;
        expand(pool, rows).await
    }

    /// Compositions of one recipe, with their ingredient.
    pub async fn compositions(pool: &PgPool, recipe_id: Uuid) -> anyhow::Result<Vec<Composition>> {
        let rows = fetch_compositions(pool, &[recipe_id]).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionWindow {
    pub take: i64,
    pub skip: i64,
}

/// `None` when nothing is available. Otherwise `skip` is uniform over every
/// offset that still yields a full window.
pub fn suggestion_window<R: Rng + ?Sized>(available: i64, rng: &mut R) -> Option<SuggestionWindow> {
    let take = available.min(SUGGESTION_COUNT);
    if take <= 0 {
        return None;
    }
    let skip = rng.gen_range(0..=available - take);
    Some(SuggestionWindow { take, skip })
}

/// Escape LIKE wildcards so user input matches literally.
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

async fn fetch_compositions(pool: &PgPool, ids: &[Uuid]) -> anyhow::Result<Vec<CompositionRow>> {
    let rows = sqlx::query_as::<_, CompositionRow>(
        "SELECT co.id, co.recipe_id, co.quantity, co.measure_unity,
                i.id AS ingredient_id, i.name AS ingredient_name, i.image AS ingredient_image
         FROM compositions co
         JOIN ingredients i ON i.id = co.ingredient_id
         WHERE co.recipe_id = ANY($1)
         ORDER BY i.name, co.id",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Load compositions, tools and comments for `rows` and attach them.
async fn expand(pool: &PgPool, rows: Vec<RecipeRow>) -> anyhow::Result<Vec<Recipe>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

    let compositions = fetch_compositions(pool, &ids).await?;

    let tools = sqlx::query_as::<_, ToolRecipeRow>(
        "SELECT tr.id, tr.recipe_id, t.id AS tool_id, t.name AS tool_name, t.image AS tool_image
         FROM tool_recipes tr
         JOIN tools t ON t.id = tr.tool_id
         WHERE tr.recipe_id = ANY($1)
         ORDER BY t.name, tr.id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let comments = sqlx::query_as::<_, Comment>(
        "SELECT id, text, user_id, recipe_id, article_id, created_at
         FROM comments
         WHERE recipe_id = ANY($1)
         ORDER BY created_at DESC, id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    Ok(stitch(rows, compositions, tools, comments))
}

/// Attach child rows to their recipe, keeping the order of every input list.
pub fn stitch(
    rows: Vec<RecipeRow>,
    compositions: Vec<CompositionRow>,
    tools: Vec<ToolRecipeRow>,
    comments: Vec<Comment>,
) -> Vec<Recipe> {
    let mut recipes: Vec<Recipe> = rows.into_iter().map(Recipe::from_row).collect();
    let index: HashMap<Uuid, usize> = recipes
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id, i))
        .collect();

    for row in compositions {
        if let Some(&i) = index.get(&row.recipe_id) {
            recipes[i].compositions.push(row.into());
        }
    }
    for row in tools {
        if let Some(&i) = index.get(&row.recipe_id) {
            recipes[i].tools_recipe.push(ToolRecipe::from(row));
        }
    }
    for comment in comments {
        if let Some(i) = comment.recipe_id.and_then(|id| index.get(&id).copied()) {
            recipes[i].comments.push(comment);
        }
    }
    recipes
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn recipe_row(title: &str) -> RecipeRow {
        RecipeRow {
            id: Uuid::new_v4(),
            title: title.into(),
            preparation_time: 30,
            difficulty: 2,
            instructions: "Mix.".into(),
            image: None,
            is_healthy: true,
            is_vegan: false,
            created_at: Utc::now(),
            category_id: Uuid::new_v4(),
            category_name: "Main".into(),
        }
    }

    fn composition_row(recipe_id: Uuid, name: &str) -> CompositionRow {
        CompositionRow {
            id: Uuid::new_v4(),
            recipe_id,
            quantity: 100.0,
            measure_unity: "grams".into(),
            ingredient_id: Uuid::new_v4(),
            ingredient_name: name.into(),
            ingredient_image: None,
        }
    }

    #[test]
    fn no_window_when_nothing_is_available() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(suggestion_window(0, &mut rng), None);
    }

    #[test]
    fn small_categories_return_everything() {
        let mut rng = StdRng::seed_from_u64(7);
        for available in 1..=SUGGESTION_COUNT {
            assert_eq!(
                suggestion_window(available, &mut rng),
                Some(SuggestionWindow {
                    take: available,
                    skip: 0
                })
            );
        }
    }

    #[test]
    fn window_always_fits_inside_the_available_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen_last_offset = false;
        for _ in 0..500 {
            let window = suggestion_window(5, &mut rng).unwrap();
            assert_eq!(window.take, 3);
            assert!((0..=2).contains(&window.skip));
            seen_last_offset |= window.skip == 2;
        }
        assert!(seen_last_offset);
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_pure\\"), "100\\%\\_pure\\\\");
        assert_eq!(escape_like("cake"), "cake");
    }

    #[test]
    fn stitch_routes_children_to_their_recipe() {
        let cake = recipe_row("Chocolate Cake");
        let salad = recipe_row("Caesar Salad");
        let (cake_id, salad_id) = (cake.id, salad.id);

        let comments = vec![Comment {
            id: Uuid::new_v4(),
            text: "Amazing!".into(),
            user_id: "user_123".into(),
            recipe_id: Some(cake_id),
            article_id: None,
            created_at: Utc::now(),
        }];
        let compositions = vec![
            composition_row(cake_id, "Butter"),
            composition_row(salad_id, "Olive Oil"),
            composition_row(cake_id, "Flour"),
            composition_row(Uuid::new_v4(), "Orphan"),
        ];

        let recipes = stitch(vec![cake, salad], compositions, Vec::new(), comments);
        assert_eq!(recipes[0].id, cake_id);
        let names: Vec<_> = recipes[0]
            .compositions
            .iter()
            .map(|c| c.ingredient.name.as_str())
            .collect();
        assert_eq!(names, vec!["Butter", "Flour"]);
        assert_eq!(recipes[0].comments.len(), 1);
        assert_eq!(recipes[1].compositions.len(), 1);
        assert!(recipes[1].comments.is_empty());
    }
}
