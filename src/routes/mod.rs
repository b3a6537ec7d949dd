pub mod articles;
pub mod catalog;
pub mod comments;
pub mod health;
pub mod meal_plan_recipes;
pub mod meal_plans;
pub mod metrics;
pub mod nutrition;
pub mod recipes;
pub mod users;
pub mod webhooks;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{middleware::auth::JwtSecret, AppState};

/// Full HTTP surface of the API.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(cors_origin(state.config.app_base_url.clone()));

    let jwt_secret = JwtSecret(state.config.jwt_secret.clone());

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::metrics_handler))
        // Recipes
        .route("/recipe", get(recipes::list_recipes))
        .route("/recipe/category", get(recipes::list_recipes_by_category))
        .route("/recipe/{id}", get(recipes::get_recipe))
        .route("/recipe/{id}/comments", post(comments::post_recipe_comment))
        .route("/recipe/{id}/nutrition", get(recipes::recipe_nutrition))
        .route("/search", get(recipes::search_recipes))
        .route(
            "/suggestions/{category_id}/{current_recipe_id}",
            get(recipes::suggest_recipes),
        )
        // Catalog
        .route("/category", get(catalog::list_categories))
        .route("/ingredient", get(catalog::list_ingredients))
        .route("/tool", get(catalog::list_tools))
        // Articles
        .route("/article", get(articles::list_articles))
        .route("/article/{slug}", get(articles::get_article))
        .route("/nutrition", get(nutrition::get_nutrition))
        // Meal plans
        .route(
            "/mealplan",
            get(meal_plans::list_meal_plans)
                .post(meal_plans::create_meal_plan)
                .delete(meal_plans::delete_meal_plan),
        )
        .route(
            "/mealplanrecipe",
            post(meal_plan_recipes::add_meal_plan_recipe)
                .put(meal_plan_recipes::update_meal_plan_recipe)
                .delete(meal_plan_recipes::remove_meal_plan_recipe),
        )
        // Users
        .route("/users", get(users::list_users))
        .route("/users/avatar", get(users::get_avatar))
        .route("/webhooks/identity", post(webhooks::identity_webhook))
        .layer(axum::Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}

/// The configured frontend origin, plus localhost for local development.
fn cors_origin(base_url: String) -> AllowOrigin {
    let base = base_url.trim_end_matches('/').to_string();
    AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let Ok(o) = origin.to_str() else {
            return false;
        };
        o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") || o == base
    })
}
