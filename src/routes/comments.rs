use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{
        extract::{ApiJson, ApiPath},
        rate_limit::{check_rate_limit, comment_key},
    },
    models::{
        auth::AuthenticatedUser,
        comment::{Comment, CreateCommentRequest},
    },
    services::{
        comments::{validate_comment_text, CommentService},
        metrics::COMMENTS_COUNTER,
    },
    AppState,
};

/// POST /recipe/{id}/comments: returns the recipe's comments, newest first
pub async fn post_recipe_comment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(recipe_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Vec<Comment>>), ApiError> {
    let text = validate_comment_text(body.text.as_deref())?;

    check_rate_limit(
        &state.redis,
        &comment_key(&user.user_id),
        state.config.comment_rate_limit,
        state.config.comment_rate_window_secs,
    )
    .await?;

    let comments = CommentService::create_for_recipe(&state.db, recipe_id, &user.user_id, &text).await?;
    COMMENTS_COUNTER.inc();
    Ok((StatusCode::CREATED, Json(comments)))
}
