//! API tests through the in-process router

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use libris_server::api::create_router;

use crate::support::{spawn_app, TestApp};

fn router(app: &TestApp) -> Router {
    create_router(app.state.clone())
}

async fn send(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router(app)
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn add_book(app: &TestApp, filename: &str, amount: Value) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/upload-metadata",
        Some(json!({
            "filename": filename,
            "name": "The Left Hand of Darkness",
            "author": "Ursula K. Le Guin",
            "genre": "Science fiction",
            "year": "1969",
            "amount": amount,
            "loandate": 14
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["book"].clone()
}

async fn add_user(app: &TestApp, name: &str, email: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/add-user",
        Some(json!({"name": name, "email": email})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["user"].clone()
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_loan_lifecycle() {
    let app = spawn_app().await;
    let book = add_book(&app, "lhod.png", json!(1)).await;
    let user = add_user(&app, "Genly Ai", "genly@ekumen.org").await;
    let loan_request = json!({"userId": user["id"], "bookId": book["id"]});

    let (status, loan) = send(&app, Method::POST, "/api/loan-book", Some(loan_request.clone())).await;
    assert_eq!(status, StatusCode::OK, "{loan}");
    assert_eq!(loan["message"], "Book loaned successfully");
    assert!(loan["return_date"].is_string());

    let (status, body) = send(&app, Method::POST, "/api/loan-book", Some(loan_request)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "AlreadyLoaned");

    let other = add_user(&app, "Estraven", "estraven@karhide.org").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/loan-book",
        Some(json!({"userId": other["id"], "bookId": book["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "ItemNotAvailable");

    let uri = format!("/api/user-loans/{}", user["id"]);
    let (status, loans) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loans.as_array().map(Vec::len), Some(1));
    assert_eq!(loans[0]["book"]["name"], "The Left Hand of Darkness");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/delete-loan/{}", loan["id"]),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoLoans");

    let (status, body) = send(&app, Method::GET, &format!("/api/books/{}", book["id"]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 0);
}

#[tokio::test]
async fn test_overdue_user_is_refused() {
    let app = spawn_app().await;
    let late = app.add_book("Overdue", 1, 14).await;
    let wanted = app.add_book("Wanted", 1, 14).await;
    let user = app.add_user("Late").await;
    app.insert_loan(user.id, late.id, chrono::Utc::now() - chrono::Duration::days(1))
        .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/loan-book",
        Some(json!({"userId": user.id, "bookId": wanted.id})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "OverdueLoan");
}

#[tokio::test]
async fn test_loan_request_requires_ids() {
    let app = spawn_app().await;

    let (status, body) = send(&app, Method::POST, "/api/loan-book", Some(json!({"userId": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing user or book ID");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/loan-book",
        Some(json!({"userId": 1, "bookId": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_numeric_metadata_is_rejected() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/upload-metadata",
        Some(json!({
            "filename": "bad.png",
            "name": "Bad",
            "author": "A",
            "genre": "G",
            "year": "abc",
            "amount": 1,
            "loandate": 14
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (status, body) = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_user_endpoints() {
    let app = spawn_app().await;
    let first = add_user(&app, "Shevek", "shevek@anarres.org").await;
    add_user(&app, "Takver", "takver@anarres.org").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/add-user",
        Some(json!({"name": "Copy", "email": "shevek@anarres.org"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate");

    let (status, body) = send(&app, Method::POST, "/api/add-user", Some(json!({"name": "No Email"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let uri = format!("/api/update-user/{}", first["id"]);
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"email": "takver@anarres.org"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate");

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"name": "Shevek of Anarres"}))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["name"], "Shevek of Anarres");

    let (status, users) = send(&app, Method::GET, "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().map(Vec::len), Some(2));

    let (status, _) = send(&app, Method::PUT, "/api/update-user/999", Some(json!({"name": "X"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_endpoints_cascade() {
    let app = spawn_app().await;
    let book = app.add_book("Cascade", 2, 14).await;
    let user = app.add_user("Cascader").await;
    app.state.services.loans.borrow(user.id, book.id).await.unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/api/users/{}", user.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User and all associated loans deleted successfully");
    assert_eq!(app.loans_of_user(user.id).await, 0);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/users/{}", user.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/books/{}", book.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &format!("/api/books/{}", book.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_book_endpoint() {
    let app = spawn_app().await;
    let book = add_book(&app, "update.png", json!("3")).await;
    let uri = format!("/api/update-book/{}", book["id"]);

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"name": "Only name"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"name": "N", "author": "A", "genre": "G", "year": "2001"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, stored) = send(&app, Method::GET, &format!("/api/books/{}", book["id"]), None).await;
    assert_eq!(stored["year"], 2001);
    assert_eq!(stored["amount"], 3);
}

#[tokio::test]
async fn test_upload_file_and_serve_it() {
    let app = spawn_app().await;
    let boundary = "libris-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cover.png\"\r\n\
         Content-Type: image/png\r\n\r\nPNGDATA\r\n--{b}--\r\n",
        b = boundary
    );

    let response = router(&app)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/upload-file")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let uploaded: Value = serde_json::from_slice(&bytes).unwrap();
    let filename = uploaded["filename"].as_str().unwrap().to_string();
    assert!(filename.ends_with("_cover.png"));

    let response = router(&app)
        .oneshot(
            Request::builder()
                .uri(format!("/uploads/{}", filename))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"PNGDATA");
}
