use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::{bad_request, error_response, log_internal, ApiError},
    middleware::extract::{ApiPath, ApiQuery},
    models::recipe::{CategoryQuery, Recipe, SearchQuery},
    routes::nutrition::lookup_nutrition,
    services::{nutrition::ingredients_query, recipes::RecipeService},
    AppState,
};

/// GET /recipe: newest first
pub async fn list_recipes(State(state): State<AppState>) -> Result<Json<Vec<Recipe>>, ApiError> {
    RecipeService::list(&state.db)
        .await
        .map(Json)
        .map_err(|e| log_internal("RECIPES", e))
}

/// GET /recipe/{id}
pub async fn get_recipe(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Recipe>, ApiError> {
    RecipeService::get(&state.db, id)
        .await
        .map_err(|e| log_internal("RECIPE", e))?
        .map(Json)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Recipe not found"))
}

/// GET /recipe/category?category=Dessert
pub async fn list_recipes_by_category(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CategoryQuery>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let category = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| bad_request("Category is required"))?;

    let recipes = RecipeService::list_by_category_name(&state.db, category)
        .await
        .map_err(|e| log_internal("CATEGORY_RECIPES", e))?;
    if recipes.is_empty() {
        return Err(error_response(
            StatusCode::NOT_FOUND,
            "No recipes found for this category",
        ));
    }
    Ok(Json(recipes))
}

/// GET /search?query=...
pub async fn search_recipes(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| bad_request("Query must be a non-empty string"))?;

    RecipeService::search(&state.db, query)
        .await
        .map(Json)
        .map_err(|e| log_internal("SEARCH", e))
}

/// GET /suggestions/{categoryId}/{currentRecipeId}
pub async fn suggest_recipes(
    State(state): State<AppState>,
    ApiPath((category_id, current_recipe_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    RecipeService::suggestions(&state.db, category_id, current_recipe_id)
        .await
        .map(Json)
        .map_err(|e| log_internal("SUGGESTIONS", e))
}

/// GET /recipe/{id}/nutrition: nutrition of the recipe's compositions
pub async fn recipe_nutrition(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let compositions = RecipeService::compositions(&state.db, id)
        .await
        .map_err(|e| log_internal("RECIPE_NUTRITION", e))?;
    if compositions.is_empty() {
        return Err(error_response(
            StatusCode::NOT_FOUND,
            "Recipe not found or has no ingredients",
        ));
    }

    lookup_nutrition(&state, &ingredients_query(&compositions)).await
}
