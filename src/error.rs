use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::cards::CardError;
use crate::club::payments::PaymentError;
use crate::models::common::ApiResponse;

/// Error type for club data handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Card(#[from] CardError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{} not found", what))
    }

    /// Map unique and foreign key violations to client errors.
    pub fn from_write(e: sqlx::Error, conflict_message: &str) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(conflict_message.to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::Validation("Referenced record does not exist".to_string())
            }
            sqlx::Error::Database(db) if db.is_check_violation() => {
                AppError::Validation(format!("Invalid value: {}", db.message()))
            }
            _ => AppError::Database(e),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Payment(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Card(e) => e.status_code(),
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Card(e) => return e.error_response(),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ApiResponse::<()>::error("Database error")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                ApiResponse::<()>::error("Internal server error")
            }
            AppError::Payment(e) => ApiResponse::<()>::error_with_message(e.to_string(), e.field()),
            other => ApiResponse::<()>::error(other.to_string()),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
