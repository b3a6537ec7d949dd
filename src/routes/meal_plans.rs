use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::{
    error::{bad_request, error_response, ApiError, ServiceError},
    middleware::extract::{ApiJson, ApiQuery},
    models::{
        auth::AuthenticatedUser,
        meal_plan::{CreateMealPlanRequest, DeleteMealPlanQuery, MealPlanQuery, MealPlanView},
    },
    services::{
        meal_plans::MealPlanService,
        metrics::{MEAL_PLANS_CREATED_COUNTER, MEAL_PLAN_CONFLICTS_COUNTER},
    },
    AppState,
};

/// GET /mealplan[?userId=...]: the caller's own plans, date ascending
pub async fn list_meal_plans(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiQuery(params): ApiQuery<MealPlanQuery>,
) -> Result<Json<Vec<MealPlanView>>, ApiError> {
    if let Some(requested) = params.user_id.as_deref() {
        if requested != user.user_id {
            return Err(error_response(
                StatusCode::FORBIDDEN,
                "Cannot read another user's meal plans",
            ));
        }
    }

    let plans = MealPlanService::list_for_user(&state.db, &user.user_id).await?;
    Ok(Json(plans))
}

/// POST /mealplan: plan plus initial recipes, written atomically
pub async fn create_meal_plan(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(body): ApiJson<CreateMealPlanRequest>,
) -> Result<(StatusCode, Json<MealPlanView>), ApiError> {
    let plan = body.validate()?;

    match MealPlanService::create(&state.db, &user.user_id, &plan).await {
        Ok(view) => {
            MEAL_PLANS_CREATED_COUNTER.inc();
            info!(
                "meal plan {} created for {} on {} with {} recipe(s)",
                view.id,
                user.user_id,
                view.date,
                view.recipes.len()
            );
            Ok((StatusCode::CREATED, Json(view)))
        }
        Err(e) => {
            if let ServiceError::DuplicateDate(_) = e {
                MEAL_PLAN_CONFLICTS_COUNTER.inc();
            }
            Err(e.into())
        }
    }
}

/// DELETE /mealplan?mealPlanId=...: owner only
pub async fn delete_meal_plan(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiQuery(params): ApiQuery<DeleteMealPlanQuery>,
) -> Result<Json<Value>, ApiError> {
    let meal_plan_id = params
        .meal_plan_id
        .ok_or_else(|| bad_request("mealPlanId is required"))?;

    MealPlanService::delete(&state.db, &user.user_id, meal_plan_id).await?;
    Ok(Json(json!({ "message": "Meal plan deleted" })))
}
