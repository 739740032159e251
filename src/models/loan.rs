//! Loan model, due date arithmetic and the overdue predicate

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Loan model from database.
///
/// A loan row exists exactly as long as the loan is open. `return_date` is
/// the due date fixed at creation, not the moment the book came back.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub loan_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        is_overdue(self.return_date, now)
    }
}

/// Loan to be inserted into the ledger
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub user_id: i64,
    pub book_id: i64,
    pub loan_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

/// Book summary embedded in a user's loan list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanBook {
    pub name: String,
}

/// Open loan joined with the loaned book's name
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserLoan {
    pub id: i64,
    pub book: LoanBook,
    pub loan_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub is_overdue: bool,
}

/// Row shape of the loans/books join
#[derive(Debug, FromRow)]
pub struct UserLoanRow {
    pub id: i64,
    pub book_name: String,
    pub loan_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

impl UserLoanRow {
    pub fn into_view(self, now: DateTime<Utc>) -> UserLoan {
        UserLoan {
            id: self.id,
            book: LoanBook { name: self.book_name },
            loan_date: self.loan_date,
            return_date: self.return_date,
            is_overdue: is_overdue(self.return_date, now),
        }
    }
}

/// Create loan request (`POST /loan-book`)
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRequest {
    #[serde(alias = "user_id")]
    pub user_id: Option<i64>,
    #[serde(alias = "book_id")]
    pub book_id: Option<i64>,
}

/// A loan is overdue once its due date lies strictly in the past.
/// Loans without a due date never become overdue.
pub fn is_overdue(return_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    return_date.is_some_and(|due| due < now)
}

/// Due date for a loan opened at `now` on a book held for `loan_period_days`
pub fn due_date(now: DateTime<Utc>, loan_period_days: i32) -> DateTime<Utc> {
    now + Duration::days(i64::from(loan_period_days))
}
