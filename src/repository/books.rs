//! Books repository (catalog store)

use sqlx::SqliteConnection;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookUpdate, NewBook},
};

#[derive(Clone, Copy, Debug, Default)]
pub struct BooksRepository;

impl BooksRepository {
    /// Get book by ID
    pub async fn get_by_id(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn list(&self, conn: &mut SqliteConnection) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id")
            .fetch_all(conn)
            .await?;
        Ok(books)
    }

    /// Insert a new book. The stored file name doubles as original name and image.
    pub async fn create(&self, conn: &mut SqliteConnection, book: &NewBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (filename, original_name, name, author, genre, year, amount, loan_period_days, image)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&book.filename)
        .bind(&book.filename)
        .bind(&book.name)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(book.year)
        .bind(book.amount)
        .bind(book.loan_period_days)
        .bind(&book.filename)
        .fetch_one(conn)
        .await?;

        Ok(created)
    }

    /// Update bibliographic fields; copy count and loan period are untouched
    pub async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        update: &BookUpdate,
    ) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "UPDATE books SET name = ?, author = ?, genre = ?, year = ? WHERE id = ? RETURNING *",
        )
        .bind(&update.name)
        .bind(&update.author)
        .bind(&update.genre)
        .bind(update.year)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn delete(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// Claim the book row for the current transaction with a no-op write.
    ///
    /// SQLite hands out its write lock on the first write of a transaction, so
    /// issuing this before any read makes every later read in the transaction
    /// current until commit. Returns `false` if the book does not exist.
    pub async fn claim(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
        let result = sqlx::query("UPDATE books SET amount = amount WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Take one copy off the shelf. Returns `false` when none is left.
    pub async fn take_copy(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
        let result = sqlx::query("UPDATE books SET amount = amount - 1 WHERE id = ? AND amount > 0")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Put one copy back on the shelf
    pub async fn restore_copy(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
        sqlx::query("UPDATE books SET amount = amount + 1 WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
