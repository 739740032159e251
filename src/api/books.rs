//! Book (catalog) endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::book::{Book, CreateBookRequest, UpdateBookRequest},
};

use super::MessageResponse;

/// Created book with status message
#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    pub message: String,
    pub book: Book,
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books in the catalog", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Add a book to the catalog
///
/// `filename` is the name returned by `/upload-file`. Numeric fields may be
/// sent as numbers or as numeric strings.
#[utoipa::path(
    post,
    path = "/upload-metadata",
    tag = "books",
    request_body = CreateBookRequest,
    responses(
        (status = 200, description = "Book created", body = BookResponse),
        (status = 400, description = "Missing field or invalid numeric value"),
        (status = 409, description = "File name already used by another book")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBookRequest>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.catalog.create_book(request).await?;

    Ok(Json(BookResponse {
        message: "Metadata uploaded successfully".to_string(),
        book,
    }))
}

/// Update a book's name, author, genre and year
#[utoipa::path(
    put,
    path = "/update-book/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 400, description = "Missing field or invalid year"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateBookRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.services.catalog.update_book(id, request).await?;
    Ok(Json(MessageResponse::new("Book updated successfully")))
}

/// Delete a book and all of its loans
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book and its loans deleted", body = MessageResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.services.catalog.delete_book(id).await?;
    Ok(Json(MessageResponse::new(
        "Book and all associated loans deleted successfully",
    )))
}
