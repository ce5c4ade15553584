//! API integration tests

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{ids::IdGenerator, Services},
    AppState,
};

/// Ids `book-1`, `book-2`, ...
struct SequentialIds(AtomicUsize);

impl IdGenerator for SequentialIds {
    fn generate(&self) -> String {
        format!("book-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

fn app() -> Router {
    api::router(AppState::new(AppConfig::default()))
}

fn app_with_sequential_ids() -> Router {
    let services =
        Services::with_id_generator(Repository::new(), Arc::new(SequentialIds(AtomicUsize::new(0))));
    api::router(AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(services),
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn book_payload(name: &str, page_count: i64, read_page: i64, reading: bool) -> Value {
    json!({
        "name": name,
        "year": 2021,
        "author": "A",
        "summary": "S",
        "publisher": "P",
        "pageCount": page_count,
        "readPage": read_page,
        "reading": reading
    })
}

async fn create(app: &Router, payload: Value) -> String {
    let (status, body) = send(app, Method::POST, "/books", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["bookId"].as_str().expect("No book ID").to_string()
}

fn names(body: &Value) -> Vec<String> {
    body["data"]["books"]
        .as_array()
        .expect("books should be an array")
        .iter()
        .map(|b| b["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_reports_book_count() {
    let app = app();
    create(&app, book_payload("Dune", 10, 1, true)).await;

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"], 1);
}

#[tokio::test]
async fn test_create_and_get_book() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(book_payload("Go Programming", 100, 100, false)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil ditambahkan");
    let id = body["data"]["bookId"].as_str().expect("No book ID");
    assert_eq!(id.len(), 16);

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert!(body.get("message").is_none());

    let book = &body["data"]["book"];
    assert_eq!(book["id"], id);
    assert_eq!(book["name"], "Go Programming");
    assert_eq!(book["year"], 2021);
    assert_eq!(book["author"], "A");
    assert_eq!(book["summary"], "S");
    assert_eq!(book["publisher"], "P");
    assert_eq!(book["pageCount"], 100);
    assert_eq!(book["readPage"], 100);
    assert_eq!(book["reading"], false);
    assert_eq!(book["finished"], true);
    assert_eq!(book["insertedAt"], book["updatedAt"]);
}

#[tokio::test]
async fn test_create_unfinished_book() {
    let app = app();
    let id = create(&app, book_payload("Dune", 200, 0, true)).await;

    let (_, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(body["data"]["book"]["finished"], false);
}

#[tokio::test]
async fn test_create_without_name_fails() {
    let app = app();
    for payload in [
        json!({"pageCount": 10, "readPage": 1}),
        json!({"name": "", "pageCount": 10, "readPage": 1}),
    ] {
        let (status, body) = send(&app, Method::POST, "/books", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
        assert_eq!(body["message"], "Gagal menambahkan buku. Mohon isi nama buku");
    }
}

#[tokio::test]
async fn test_create_with_read_page_over_page_count_fails() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(book_payload("Dune", 0, 1, false)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "Gagal menambahkan buku. readPage tidak boleh lebih besar dari pageCount"
    );

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert!(names(&body).is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_rejected_with_envelope() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("invalid json"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn test_list_books_in_insertion_order() {
    let app = app_with_sequential_ids();
    create(&app, book_payload("Cinder", 10, 1, true)).await;
    create(&app, book_payload("Arrival", 10, 1, true)).await;

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "success",
            "data": {
                "books": [
                    {"id": "book-1", "name": "Cinder", "publisher": "P"},
                    {"id": "book-2", "name": "Arrival", "publisher": "P"}
                ]
            }
        })
    );
}

#[tokio::test]
async fn test_list_filters() {
    let app = app();
    create(&app, book_payload("War and Peace", 100, 100, false)).await;
    create(&app, book_payload("Dune", 100, 10, true)).await;
    create(&app, book_payload("The Art of War", 50, 0, false)).await;

    let (_, body) = send(&app, Method::GET, "/books?name=war", None).await;
    assert_eq!(names(&body), ["War and Peace", "The Art of War"]);

    let (_, body) = send(&app, Method::GET, "/books?reading=1", None).await;
    assert_eq!(names(&body), ["Dune"]);

    let (_, body) = send(&app, Method::GET, "/books?reading=0", None).await;
    assert_eq!(names(&body), ["War and Peace", "The Art of War"]);

    let (_, body) = send(&app, Method::GET, "/books?finished=1", None).await;
    assert_eq!(names(&body), ["War and Peace"]);

    let (_, body) = send(&app, Method::GET, "/books?name=WAR&finished=0", None).await;
    assert_eq!(names(&body), ["The Art of War"]);

    let (_, body) = send(&app, Method::GET, "/books?reading=maybe", None).await;
    assert_eq!(names(&body).len(), 3);

    let (status, body) = send(&app, Method::GET, "/books?name=missing", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(names(&body).is_empty());
}

#[tokio::test]
async fn test_list_ignores_repeated_filter_keys() {
    let app = app();
    create(&app, book_payload("War and Peace", 100, 100, false)).await;
    create(&app, book_payload("Dune", 100, 10, true)).await;

    let (status, body) = send(&app, Method::GET, "/books?reading=1&reading=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(names(&body), ["War and Peace", "Dune"]);

    let (status, body) = send(
        &app,
        Method::GET,
        "/books?name=dune&name=war&finished=0",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), ["Dune"]);
}

#[tokio::test]
async fn test_null_page_count_is_stored_as_absent() {
    let app = app();
    let id = create(&app, json!({"name": "Dune", "readPage": 5, "pageCount": null})).await;

    let (_, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    let book = &body["data"]["book"];
    assert_eq!(book["readPage"], 5);
    assert!(book["pageCount"].is_null());
    assert_eq!(book["finished"], false);
}

#[tokio::test]
async fn test_get_unknown_book() {
    let (status, body) = send(&app(), Method::GET, "/books/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Buku tidak ditemukan");
}

#[tokio::test]
async fn test_update_book() {
    let app = app();
    let id = create(&app, book_payload("Dune", 100, 10, true)).await;
    let (_, before) = send(&app, Method::GET, &format!("/books/{}", id), None).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(book_payload("Dune Messiah", 200, 200, false)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "message": "Buku berhasil diperbarui"}));

    let (_, after) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    let book = &after["data"]["book"];
    assert_eq!(book["id"], id);
    assert_eq!(book["name"], "Dune Messiah");
    assert_eq!(book["pageCount"], 200);
    assert_eq!(book["reading"], false);
    assert_eq!(book["finished"], true);
    assert_eq!(book["insertedAt"], before["data"]["book"]["insertedAt"]);
}

#[tokio::test]
async fn test_update_with_read_page_over_page_count_fails() {
    let app = app();
    let id = create(&app, book_payload("Go Programming", 100, 100, false)).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(book_payload("Go Programming", 100, 150, false)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "Gagal memperbarui buku. readPage tidak boleh lebih besar dari pageCount"
    );

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(json!({"pageCount": 100, "readPage": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Gagal memperbarui buku. Mohon isi nama buku");
}

#[tokio::test]
async fn test_update_unknown_book_leaves_collection_unchanged() {
    let app = app();
    create(&app, book_payload("Dune", 100, 10, true)).await;
    let (_, before) = send(&app, Method::GET, "/books", None).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/books/nope",
        Some(book_payload("Other", 1, 1, false)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Gagal memperbarui buku. Id tidak ditemukan");

    let (_, after) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_delete_book() {
    let app = app();
    let keep = create(&app, book_payload("Keep", 10, 1, true)).await;
    let gone = create(&app, book_payload("Gone", 10, 1, true)).await;
    let (_, kept_before) = send(&app, Method::GET, &format!("/books/{}", keep), None).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/books/{}", gone), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "message": "Buku berhasil dihapus"}));

    let (status, _) = send(&app, Method::GET, &format!("/books/{}", gone), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, kept_after) = send(&app, Method::GET, &format!("/books/{}", keep), None).await;
    assert_eq!(kept_before, kept_after);

    let (status, body) = send(&app, Method::DELETE, &format!("/books/{}", gone), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Buku gagal dihapus. Id tidak ditemukan");
}

#[tokio::test]
async fn test_concurrent_creates_yield_unique_ids() {
    let app = app();
    let handles: Vec<_> = (0..32)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move { create(&app, book_payload(&format!("Book {}", i), 10, 1, true)).await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 32);

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(names(&body).len(), 32);
}
