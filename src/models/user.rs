//! User (patron) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// User model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Unique across all users
    pub email: String,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "Name and email are required"))]
    #[serde(default)]
    pub name: String,
    #[validate(length(min = 1, message = "Name and email are required"))]
    #[serde(default)]
    pub email: String,
}

impl CreateUser {
    /// Strip surrounding whitespace so validation sees the values that get stored
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }
}

/// Update user request; omitted or empty fields are left unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateUser {
    /// Drop empty values and require at least one field to change
    pub fn normalized(self) -> AppResult<Self> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let update = Self {
            name: non_empty(self.name),
            email: non_empty(self.email),
        };
        if update.name.is_none() && update.email.is_none() {
            return Err(AppError::Validation(
                "At least one field (name or email) must be provided to update".to_string(),
            ));
        }
        Ok(update)
    }
}

/// Flatten `validator` errors into a single validation message
pub(crate) fn validation_error(errors: validator::ValidationErrors) -> AppError {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| errors.to_string());
    AppError::Validation(message)
}
