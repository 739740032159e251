//! Error types for Libris server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable error codes carried in every error response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 3,
    ItemNotAvailable = 7,
    Duplicate = 8,
    BadValue = 18,
    NoSuchData = 20,
    AlreadyLoaned = 22,
    OverdueLoan = 23,
    NoLoans = 24,
    StoreBusy = 25,
}

/// Failure taxonomy the API layer uses to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    BusinessRule,
    StoreFailure,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No loans found for user {0}")]
    NoLoans(i64),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Email {0} is already in use by another user")]
    EmailConflict(String),

    #[error("User {user_id} has already loaned book {book_id}")]
    AlreadyLoaned { user_id: i64, book_id: i64 },

    #[error("User {user_id} has an overdue loan and cannot loan a new book until it is returned")]
    OverdueBlock { user_id: i64 },

    #[error("No available copies of book {book_id}")]
    NoCopiesAvailable { book_id: i64 },

    #[error("Store busy: {0}")]
    StoreBusy(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_) | AppError::NoLoans(_) => ErrorKind::NotFound,
            AppError::Validation(_) | AppError::BadRequest(_) => ErrorKind::Validation,
            AppError::Conflict(_) | AppError::EmailConflict(_) | AppError::AlreadyLoaned { .. } => {
                ErrorKind::Conflict
            }
            AppError::OverdueBlock { .. } | AppError::NoCopiesAvailable { .. } => {
                ErrorKind::BusinessRule
            }
            AppError::StoreBusy(_) | AppError::Database(_) | AppError::Internal(_) => {
                ErrorKind::StoreFailure
            }
        }
    }

    /// Whether the caller may simply retry the same request
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StoreBusy(_))
    }

    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData),
            AppError::NoLoans(_) => (StatusCode::NOT_FOUND, ErrorCode::NoLoans),
            AppError::Validation(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue)
            }
            AppError::Conflict(_) | AppError::EmailConflict(_) => {
                (StatusCode::CONFLICT, ErrorCode::Duplicate)
            }
            AppError::AlreadyLoaned { .. } => (StatusCode::CONFLICT, ErrorCode::AlreadyLoaned),
            AppError::OverdueBlock { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::OverdueLoan)
            }
            AppError::NoCopiesAvailable { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::ItemNotAvailable)
            }
            AppError::StoreBusy(_) => (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::StoreBusy),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut => {
                AppError::StoreBusy("Timed out waiting for a database connection".to_string())
            }
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(db.message().to_string())
            }
            sqlx::Error::Database(db) if is_busy_code(db.code().as_deref()) => {
                AppError::StoreBusy(db.message().to_string())
            }
            _ => AppError::Database(e),
        }
    }
}

/// SQLITE_BUSY (5) and SQLITE_LOCKED (6), including their extended codes
fn is_busy_code(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .map(|c| matches!(c & 0xff, 5 | 6))
        .unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::StoreBusy(msg) => {
                tracing::warn!("Store busy: {}", msg);
                "The library database is busy, please retry".to_string()
            }
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg) => msg.clone(),
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
