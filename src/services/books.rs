//! Book management service

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use validator::Validate;

use super::ids::IdGenerator;
use crate::{
    error::{AppError, AppResult},
    models::book::{validation_message, Book, BookFilter, BookPayload, BookQuery, BookSummary},
    repository::Repository,
};

/// Attempts at finding an unused id before giving up
const MAX_ID_ATTEMPTS: usize = 8;

const ADD_FAILED: &str = "Gagal menambahkan buku";
const UPDATE_FAILED: &str = "Gagal memperbarui buku";

#[derive(Clone)]
pub struct BookService {
    repository: Repository,
    ids: Arc<dyn IdGenerator>,
}

impl BookService {
    pub fn new(repository: Repository, ids: Arc<dyn IdGenerator>) -> Self {
        Self { repository, ids }
    }

    /// Validate and store a new book, returning its id
    pub async fn create(&self, payload: BookPayload) -> AppResult<String> {
        check_payload(&payload, ADD_FAILED)?;

        let mut book = Book::new(String::new(), payload, timestamp_now());
        for _ in 0..MAX_ID_ATTEMPTS {
            book.id = self.ids.generate();
            let id = book.id.clone();
            book = match self.repository.books.insert(book).await {
                Ok(true) => {
                    tracing::info!("Book added: id={}", id);
                    return Ok(id);
                }
                Ok(false) => break,
                Err(rejected) => {
                    tracing::warn!("Generated book id {} already in use", id);
                    rejected
                }
            };
        }

        Err(AppError::Internal("Buku gagal ditambahkan".to_string()))
    }

    /// List book summaries matching the query filters
    pub async fn list(&self, query: &BookQuery) -> Vec<BookSummary> {
        let filter = BookFilter::from(query);
        let books = self.repository.books.list(&filter).await;
        tracing::debug!("Listed {} books with {:?}", books.len(), filter);
        books
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await.ok_or_else(|| {
            tracing::debug!("Book {} not found", id);
            AppError::NotFound("Buku tidak ditemukan".to_string())
        })
    }

    /// Validate and replace every mutable field of an existing book.
    /// `finished` is recomputed from the new page values.
    pub async fn update(&self, id: &str, payload: BookPayload) -> AppResult<()> {
        check_payload(&payload, UPDATE_FAILED)?;

        if !self.repository.books.update(id, payload, timestamp_now()).await {
            tracing::warn!("Update of unknown book {}", id);
            return Err(AppError::NotFound(format!(
                "{}. Id tidak ditemukan",
                UPDATE_FAILED
            )));
        }
        tracing::info!("Book updated: id={}", id);
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.repository.books.delete(id).await {
            tracing::warn!("Delete of unknown book {}", id);
            return Err(AppError::NotFound(
                "Buku gagal dihapus. Id tidak ditemukan".to_string(),
            ));
        }
        tracing::info!("Book deleted: id={}", id);
        Ok(())
    }

    /// Number of stored books (for readiness)
    pub async fn count(&self) -> usize {
        self.repository.books.count().await
    }
}

fn check_payload(payload: &BookPayload, action: &str) -> AppResult<()> {
    payload.validate().map_err(|errors| {
        let message = format!("{}. {}", action, validation_message(&errors));
        tracing::warn!("Rejected book payload: {}", message);
        AppError::Validation(message)
    })
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`
fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
