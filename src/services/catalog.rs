//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookUpdate, CreateBookRequest, NewBook, UpdateBookRequest},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        let mut conn = self.repository.pool.acquire().await?;
        self.repository.books.list(&mut conn).await
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        let mut conn = self.repository.pool.acquire().await?;
        self.repository.books.get_by_id(&mut conn, id).await
    }

    /// Validate book metadata and add it to the catalog.
    /// Nothing is written unless every field is valid.
    pub async fn create_book(&self, request: CreateBookRequest) -> AppResult<Book> {
        let book = NewBook::try_from(request).inspect_err(|e| {
            tracing::info!("Rejected book metadata: {}", e);
        })?;

        let mut conn = self.repository.pool.acquire().await?;
        let created = match self.repository.books.create(&mut conn, &book).await {
            Err(AppError::Conflict(_)) => {
                return Err(AppError::Conflict(format!(
                    "A book with filename {} already exists",
                    book.filename
                )))
            }
            other => other?,
        };

        tracing::info!("Added book {} ({})", created.id, created.name);
        Ok(created)
    }

    /// Replace a book's bibliographic fields
    pub async fn update_book(&self, id: i64, request: UpdateBookRequest) -> AppResult<Book> {
        let update = BookUpdate::try_from(request)?;

        let mut conn = self.repository.pool.acquire().await?;
        let book = self.repository.books.update(&mut conn, id, &update).await?;

        tracing::info!("Book with ID {} updated successfully", id);
        Ok(book)
    }

    /// Delete a book together with every loan referencing it
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        let mut tx = self.repository.begin().await?;

        // Children first, then the parent, in one transaction
        let removed = self.repository.loans.delete_for_book(&mut tx, id).await?;
        self.repository.books.delete(&mut tx, id).await?;

        tx.commit().await?;

        tracing::info!("Book {} and {} associated loans deleted successfully", id, removed);
        Ok(())
    }
}
