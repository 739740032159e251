//! Loan management endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::loan::{CreateLoanRequest, UserLoan},
};

use super::MessageResponse;

/// Loan response with calculated due date
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    /// Loan ID
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub loan_date: DateTime<Utc>,
    /// Due date (ISO 8601 format)
    pub return_date: Option<DateTime<Utc>>,
    /// Status message
    pub message: String,
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/loan-book",
    tag = "loans",
    request_body = CreateLoanRequest,
    responses(
        (status = 200, description = "Book loaned", body = LoanResponse),
        (status = 400, description = "Missing user or book ID"),
        (status = 404, description = "User or book not found"),
        (status = 409, description = "User has already loaned this book"),
        (status = 422, description = "User has an overdue loan, or no copies are available"),
        (status = 503, description = "Database busy, retry")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateLoanRequest>,
) -> AppResult<Json<LoanResponse>> {
    let (user_id, book_id) = match (request.user_id, request.book_id) {
        (Some(user_id), Some(book_id)) if user_id > 0 && book_id > 0 => (user_id, book_id),
        _ => {
            tracing::warn!("Missing user or book ID");
            return Err(AppError::Validation("Missing user or book ID".to_string()));
        }
    };

    tracing::info!(
        "Received loan request for user_id: {} and book_id: {}",
        user_id,
        book_id
    );
    let loan = state.services.loans.borrow(user_id, book_id).await?;

    Ok(Json(LoanResponse {
        id: loan.id,
        user_id: loan.user_id,
        book_id: loan.book_id,
        loan_date: loan.loan_date,
        return_date: loan.return_date,
        message: "Book loaned successfully".to_string(),
    }))
}

/// Get the open loans of a user
#[utoipa::path(
    get,
    path = "/user-loans/{id}",
    tag = "loans",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's open loans", body = Vec<UserLoan>),
        (status = 404, description = "No loans found for this user")
    )
)]
pub async fn get_user_loans(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<UserLoan>>> {
    let loans = state.services.loans.get_user_loans(user_id).await?;
    Ok(Json(loans))
}

/// Return a book (close the loan)
#[utoipa::path(
    delete,
    path = "/delete-loan/{id}",
    tag = "loans",
    params(
        ("id" = i64, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan closed", body = MessageResponse),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.services.loans.return_loan(loan_id).await?;
    Ok(Json(MessageResponse::new("Loan deleted successfully!")))
}
