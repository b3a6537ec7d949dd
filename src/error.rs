use axum::{http::StatusCode, Json};
use chrono::NaiveDate;
use serde_json::{json, Value};
use thiserror::Error;

/// Error shape returned by every handler: a status code and `{ "error": message }`.
pub type ApiError = (StatusCode, Json<Value>);

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("A meal plan already exists for {0}")]
    DuplicateDate(NaiveDate),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Unknown recipe")]
    UnknownRecipe,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::UnknownRecipe => StatusCode::BAD_REQUEST,
            ServiceError::DuplicateDate(_) => StatusCode::CONFLICT,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = err.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("{err}");
            return internal_error();
        }
        error_response(status, err.to_string())
    }
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

pub fn bad_request(message: impl Into<String>) -> ApiError {
    error_response(StatusCode::BAD_REQUEST, message)
}

pub fn internal_error() -> ApiError {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

/// Log an unexpected failure and hide its details from the client.
pub fn log_internal(context: &str, err: impl std::fmt::Display) -> ApiError {
    tracing::error!("[{context}] {err}");
    internal_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        assert_eq!(
            ServiceError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ServiceError::UnknownRecipe.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServiceError::DuplicateDate(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::NotFound("Meal plan").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn database_errors_are_not_leaked() {
        let (status, Json(body)) = ApiError::from(ServiceError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[test]
    fn duplicate_date_message_names_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let (status, Json(body)) = ApiError::from(ServiceError::DuplicateDate(date));
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "A meal plan already exists for 2024-06-01");
    }
}
