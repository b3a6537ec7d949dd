use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::{error_response, log_internal, ApiError},
    middleware::extract::ApiPath,
    models::article::Article,
    services::articles::ArticleService,
    AppState,
};

/// GET /article: newest first
pub async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<Article>>, ApiError> {
    ArticleService::list(&state.db)
        .await
        .map(Json)
        .map_err(|e| log_internal("ARTICLES", e))
}

/// GET /article/{slug}
pub async fn get_article(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Article>, ApiError> {
    ArticleService::get_by_slug(&state.db, &slug)
        .await
        .map_err(|e| log_internal("ARTICLE", e))?
        .map(Json)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Article not found"))
}
