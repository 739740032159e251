//! Loan management service: borrowing, returning and the loan list

use chrono::Utc;

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::loan::{due_date, Loan, NewLoan, UserLoan},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: LoansConfig,
}

impl LoansService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self { repository, config }
    }

    /// Open a loan of `book_id` for `user_id`.
    ///
    /// Checks run in a fixed order and the first failure wins: both records
    /// exist, the pair is not already linked, the user has nothing overdue,
    /// a copy is left. The decrement and the insert commit together.
    pub async fn borrow(&self, user_id: i64, book_id: i64) -> AppResult<Loan> {
        let mut tx = self.repository.begin().await?;

        // Write lock first: every read below sees the state we commit against
        if !self.repository.books.claim(&mut tx, book_id).await? {
            tracing::warn!("Book with ID {} not found", book_id);
            return Err(AppError::NotFound(format!("Book with id {} not found", book_id)));
        }
        self.repository.users.get_by_id(&mut tx, user_id).await?;

        if self
            .repository
            .loans
            .find_for_pair(&mut tx, user_id, book_id)
            .await?
            .is_some()
        {
            tracing::warn!("User {} has already loaned book {}", user_id, book_id);
            return Err(AppError::AlreadyLoaned { user_id, book_id });
        }

        let now = Utc::now();
        let held = self.repository.loans.list_for_user(&mut tx, user_id).await?;
        if held.iter().any(|loan| loan.is_overdue(now)) {
            tracing::warn!("User {} has an overdue loan and cannot loan a new book", user_id);
            return Err(AppError::OverdueBlock { user_id });
        }

        let book = self.repository.books.get_by_id(&mut tx, book_id).await?;
        if book.amount < 1 || !self.repository.books.take_copy(&mut tx, book_id).await? {
            tracing::warn!("No available copies of book {}", book_id);
            return Err(AppError::NoCopiesAvailable { book_id });
        }

        let loan = self
            .repository
            .loans
            .create(
                &mut tx,
                &NewLoan {
                    user_id,
                    book_id,
                    loan_date: now,
                    return_date: Some(due_date(now, book.loan_period_days)),
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Book {} loaned successfully to user {}, return date: {:?}",
            book_id,
            user_id,
            loan.return_date
        );
        Ok(loan)
    }

    /// Close a loan by deleting it.
    ///
    /// The copy only goes back on the shelf when `restore_copies_on_return`
    /// is enabled; otherwise `amount` is left as it is.
    pub async fn return_loan(&self, loan_id: i64) -> AppResult<Loan> {
        let mut tx = self.repository.begin().await?;

        let loan = self.repository.loans.delete(&mut tx, loan_id).await?;
        if self.config.restore_copies_on_return {
            self.repository.books.restore_copy(&mut tx, loan.book_id).await?;
        }

        tx.commit().await?;

        tracing::info!("Loan with ID {} deleted successfully", loan_id);
        Ok(loan)
    }

    /// Open loans of a user with the loaned book's name.
    /// An empty list is reported as `NoLoans`, not as an empty result.
    pub async fn get_user_loans(&self, user_id: i64) -> AppResult<Vec<UserLoan>> {
        let mut conn = self.repository.pool.acquire().await?;
        let rows = self.repository.loans.get_user_loans(&mut conn, user_id).await?;

        if rows.is_empty() {
            tracing::warn!("No loans found for user with ID: {}", user_id);
            return Err(AppError::NoLoans(user_id));
        }

        let now = Utc::now();
        let loans: Vec<UserLoan> = rows.into_iter().map(|row| row.into_view(now)).collect();
        tracing::info!("Retrieved {} loans for user with ID: {}", loans.len(), user_id);
        Ok(loans)
    }
}
