//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use super::response::{
    ApiResponse, BookData, BookIdData, BookIdResponse, BookListData, BookListResponse,
    BookResponse, MessageResponse,
};
use crate::{
    error::{AppError, AppResult},
    models::book::{BookPayload, BookQuery},
};

/// Add a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book added", body = BookIdResponse),
        (status = 400, description = "Missing name or readPage above pageCount", body = MessageResponse),
        (status = 500, description = "Book could not be stored", body = MessageResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<BookPayload>, AppError>,
) -> AppResult<(StatusCode, Json<BookIdResponse>)> {
    let book_id = state.services.books.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Buku berhasil ditambahkan",
            BookIdData { book_id },
        )),
    ))
}

/// List books, optionally filtered
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Book summaries", body = BookListResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    WithRejection(Query(pairs), _): WithRejection<Query<Vec<(String, String)>>, AppError>,
) -> AppResult<Json<BookListResponse>> {
    let query = BookQuery::from_pairs(&pairs);
    let books = state.services.books.list(&query).await;
    Ok(Json(ApiResponse::success(BookListData { books })))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{bookId}",
    tag = "books",
    params(("bookId" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookResponse),
        (status = 404, description = "Book not found", body = MessageResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<String>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.books.get_by_id(&book_id).await?;
    Ok(Json(ApiResponse::success(BookData { book })))
}

/// Replace a book's details
#[utoipa::path(
    put,
    path = "/books/{bookId}",
    tag = "books",
    params(("bookId" = String, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 400, description = "Missing name or readPage above pageCount", body = MessageResponse),
        (status = 404, description = "Book not found", body = MessageResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<BookPayload>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.update(&book_id, payload).await?;
    Ok(Json(ApiResponse::ack("Buku berhasil diperbarui")))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{bookId}",
    tag = "books",
    params(("bookId" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = MessageResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.delete(&book_id).await?;
    Ok(Json(ApiResponse::ack("Buku berhasil dihapus")))
}
