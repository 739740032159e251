//! Loans repository (loan ledger)

use sqlx::SqliteConnection;

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, NewLoan, UserLoanRow},
};

#[derive(Clone, Copy, Debug, Default)]
pub struct LoansRepository;

impl LoansRepository {
    /// Find the loan linking this user to this book, if any
    pub async fn find_for_pair(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        book_id: i64,
    ) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            "SELECT * FROM loans WHERE user_id = ? AND book_id = ? LIMIT 1",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(conn)
        .await?;
        Ok(loan)
    }

    /// All loans held by a user
    pub async fn list_for_user(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE user_id = ? ORDER BY id")
            .bind(user_id)
            .fetch_all(conn)
            .await?;
        Ok(loans)
    }

    /// Loans for a user joined with the loaned book's name
    pub async fn get_user_loans(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> AppResult<Vec<UserLoanRow>> {
        let rows = sqlx::query_as::<_, UserLoanRow>(
            r#"
            SELECT l.id, b.name AS book_name, l.loan_date, l.return_date
            FROM loans l
            JOIN books b ON l.book_id = b.id
            WHERE l.user_id = ?
            ORDER BY l.id
            "#,
        )
        .bind(user_id)
        .fetch_all(conn)
        .await?;
        Ok(rows)
    }

    /// Create a new loan
    pub async fn create(&self, conn: &mut SqliteConnection, loan: &NewLoan) -> AppResult<Loan> {
        let created = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (user_id, book_id, loan_date, return_date)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(loan.user_id)
        .bind(loan.book_id)
        .bind(loan.loan_date)
        .bind(loan.return_date)
        .fetch_one(conn)
        .await?;
        Ok(created)
    }

    /// Delete a loan, returning the removed row
    pub async fn delete(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("DELETE FROM loans WHERE id = ? RETURNING *")
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Delete every loan held by a user, returning the removed rows
    pub async fn delete_for_user(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> AppResult<Vec<Loan>> {
        let removed = sqlx::query_as::<_, Loan>("DELETE FROM loans WHERE user_id = ? RETURNING *")
            .bind(user_id)
            .fetch_all(conn)
            .await?;
        Ok(removed)
    }

    /// Delete every loan referencing a book, returning how many were removed
    pub async fn delete_for_book(&self, conn: &mut SqliteConnection, book_id: i64) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM loans WHERE book_id = ?")
            .bind(book_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
