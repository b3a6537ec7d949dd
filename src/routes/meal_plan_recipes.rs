use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    error::{bad_request, ApiError},
    middleware::extract::ApiJson,
    models::{
        auth::AuthenticatedUser,
        meal_plan::{
            AddMealPlanRecipeRequest, DeleteMealPlanRecipeRequest, MealPlanRecipe,
            UpdateMealPlanRecipeRequest,
        },
    },
    services::meal_plans::MealPlanService,
    AppState,
};

/// POST /mealplanrecipe
pub async fn add_meal_plan_recipe(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(body): ApiJson<AddMealPlanRecipeRequest>,
) -> Result<(StatusCode, Json<MealPlanRecipe>), ApiError> {
    let (meal_plan_id, assignment) = body.validate()?;
    let row = MealPlanService::add_recipe(&state.db, &user.user_id, meal_plan_id, &assignment).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /mealplanrecipe: retag and/or reorder
pub async fn update_meal_plan_recipe(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(body): ApiJson<UpdateMealPlanRecipeRequest>,
) -> Result<Json<MealPlanRecipe>, ApiError> {
    let (id, changes) = body.validate()?;
    let row = MealPlanService::update_recipe(&state.db, &user.user_id, id, &changes).await?;
    Ok(Json(row))
}

/// DELETE /mealplanrecipe: id comes in the JSON body
pub async fn remove_meal_plan_recipe(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(body): ApiJson<DeleteMealPlanRecipeRequest>,
) -> Result<Json<Value>, ApiError> {
    let id = body
        .meal_plan_recipe_id
        .ok_or_else(|| bad_request("mealPlanRecipeId is required"))?;

    MealPlanService::remove_recipe(&state.db, &user.user_id, id).await?;
    Ok(Json(json!({ "message": "Recipe removed from meal plan" })))
}
