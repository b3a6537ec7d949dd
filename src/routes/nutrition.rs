use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{bad_request, error_response, log_internal, ApiError},
    middleware::extract::ApiQuery,
    services::{metrics::NUTRITION_LOOKUPS_COUNTER, nutrition::NutritionError},
    AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionQuery {
    pub ingredients_string: Option<String>,
}

/// GET /nutrition?ingredientsString=...: raw Edamam proxy
pub async fn get_nutrition(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<NutritionQuery>,
) -> Result<Json<Value>, ApiError> {
    let ingredients = params
        .ingredients_string
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| bad_request("Missing ingredients string"))?;

    lookup_nutrition(&state, ingredients).await
}

pub async fn lookup_nutrition(state: &AppState, ingredients: &str) -> Result<Json<Value>, ApiError> {
    match state.nutrition.analyze(ingredients).await {
        Ok(data) => {
            NUTRITION_LOOKUPS_COUNTER.with_label_values(&["ok"]).inc();
            Ok(Json(data))
        }
        Err(NutritionError::NotConfigured) => {
            NUTRITION_LOOKUPS_COUNTER.with_label_values(&["unconfigured"]).inc();
            Err(error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Nutrition lookup is not configured",
            ))
        }
        Err(e) => {
            NUTRITION_LOOKUPS_COUNTER.with_label_values(&["error"]).inc();
            Err(log_internal("NUTRITION", e))
        }
    }
}
