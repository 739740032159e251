//! API handlers for Libris REST endpoints

pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod uploads;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::AppState;

/// Plain acknowledgement body
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_dir = state.services.uploads.dir().to_path_buf();
    let body_limit = state.config.uploads.max_size_bytes;

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books (catalog)
        .route("/books", get(books::list_books))
        .route("/books/:id", get(books::get_book).delete(books::delete_book))
        .route("/upload-metadata", post(books::create_book))
        .route("/update-book/:id", put(books::update_book))
        .route("/upload-file", post(uploads::upload_file))
        // Users
        .route("/users", get(users::list_users))
        .route("/add-user", post(users::create_user))
        .route("/users/:id", get(users::get_user).delete(users::delete_user))
        .route("/update-user/:id", put(users::update_user))
        // Loans
        .route("/loan-book", post(loans::create_loan))
        .route("/user-loans/:id", get(loans::get_user_loans))
        .route("/delete-loan/:id", delete(loans::return_loan))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .merge(openapi::create_openapi_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
