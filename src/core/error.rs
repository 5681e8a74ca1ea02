use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String, Option<Vec<String>>) {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone(), None),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Image storage is unavailable".to_string(),
                    None,
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = self.status_and_message();
        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(e.body_text())
        } else {
            AppError::BadRequest(format!("Failed to read multipart data: {}", e.body_text()))
        }
    }
}

/// Map unique and foreign key violations to client errors.
///
/// `what` names the entity for the conflict message, e.g. "Report".
pub fn map_db_error(what: &str) -> impl Fn(sqlx::Error) -> AppError + '_ {
    move |e: sqlx::Error| {
        if let sqlx::Error::Database(db_err) = &e {
            // PostgreSQL unique_violation
            if db_err.code().as_deref() == Some("23505") {
                let field = db_err
                    .constraint()
                    .map(|c| c.trim_end_matches("_key").rsplit('_').next().unwrap_or(c))
                    .unwrap_or("key");
                return AppError::Conflict(format!(
                    "{} with this {} already exists",
                    what, field
                ));
            }

            // PostgreSQL foreign_key_violation
            if db_err.code().as_deref() == Some("23503") {
                return AppError::BadRequest("Referenced record does not exist".to_string());
            }
        }

        tracing::error!("{} query failed: {:?}", what, e);
        AppError::Database(e)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
