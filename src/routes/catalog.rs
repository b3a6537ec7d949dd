use axum::{extract::State, Json};

use crate::{
    error::{log_internal, ApiError},
    models::catalog::{Category, Ingredient, Tool},
    services::catalog::CatalogService,
    AppState,
};

/// GET /category
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    CatalogService::list_categories(&state.db)
        .await
        .map(Json)
        .map_err(|e| log_internal("CATEGORIES", e))
}

/// GET /ingredient
pub async fn list_ingredients(
    State(state): State<AppState>,
) -> Result<Json<Vec<Ingredient>>, ApiError> {
    CatalogService::list_ingredients(&state.db)
        .await
        .map(Json)
        .map_err(|e| log_internal("INGREDIENTS", e))
}

/// GET /tool
pub async fn list_tools(State(state): State<AppState>) -> Result<Json<Vec<Tool>>, ApiError> {
    CatalogService::list_tools(&state.db)
        .await
        .map(Json)
        .map_err(|e| log_internal("TOOLS", e))
}
