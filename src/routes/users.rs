use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{bad_request, error_response, log_internal, ApiError},
    middleware::extract::ApiQuery,
    models::{auth::AuthenticatedUser, user::User},
    services::users::UserService,
    AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarQuery {
    pub user_id: Option<String>,
}

fn require_admin(user: &AuthenticatedUser) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(error_response(StatusCode::FORBIDDEN, "Access denied"))
    }
}

/// GET /users: admin panel user list
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<User>>, ApiError> {
    require_admin(&user)?;
    UserService::list(&state.db)
        .await
        .map(Json)
        .map_err(|e| log_internal("USERS", e))
}

/// GET /users/avatar?userId=...: avatar shown next to a comment author
pub async fn get_avatar(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<AvatarQuery>,
) -> Result<Json<Value>, ApiError> {
    let user_id = params
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| bad_request("User ID is required"))?;

    let avatar = UserService::avatar(&state.db, user_id)
        .await
        .map_err(|e| log_internal("AVATAR", e))?
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "User not found"))?;

    Ok(Json(json!({ "avatarUrl": avatar.image_url })))
}
