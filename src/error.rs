use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// AppError
///
/// The single error type surfaced by handlers and repository write paths.
/// Each variant maps onto one HTTP status; the message becomes the JSON `error` field.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Admin role required")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Maps driver errors onto API semantics.
/// A unique-constraint violation is a duplicate slug or email (409). A foreign-key violation
/// is a post referencing a category, tag or reviewer that does not exist (400).
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::Conflict("A record with this name already exists".to_string());
            }
            if db_err.is_foreign_key_violation() {
                return AppError::Validation("Unknown category, tag or reviewer".to_string());
            }
        }

        match err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            other => {
                tracing::error!("database error: {:?}", other);
                AppError::Database(other.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the logs; clients get a generic message.
        let message = match &self {
            AppError::Database(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
