//! In-memory book store

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::book::{Book, BookFilter, BookPayload, BookSummary};

/// Ordered book collection guarded by a single lock.
///
/// Each method takes the lock once, so every operation is atomic with
/// respect to the others.
#[derive(Clone, Default)]
pub struct BooksRepository {
    books: Arc<RwLock<Vec<Book>>>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a book and check it can be found again.
    ///
    /// Returns `Err(book)` untouched when its id is already taken, otherwise
    /// whether the record is present after insertion.
    pub async fn insert(&self, book: Book) -> Result<bool, Book> {
        let mut books = self.books.write().await;
        if books.iter().any(|b| b.id == book.id) {
            return Err(book);
        }
        let id = book.id.clone();
        books.push(book);
        Ok(books.iter().any(|b| b.id == id))
    }

    /// Summaries of the books matching `filter`, in insertion order
    pub async fn list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        let books = self.books.read().await;
        books
            .iter()
            .filter(|book| filter.matches(book))
            .map(BookSummary::from)
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Book> {
        let books = self.books.read().await;
        books.iter().find(|b| b.id == id).cloned()
    }

    /// Returns false when no book has this id
    pub async fn update(&self, id: &str, payload: BookPayload, timestamp: String) -> bool {
        let mut books = self.books.write().await;
        match books.iter_mut().find(|b| b.id == id) {
            Some(book) => {
                book.apply(payload, timestamp);
                true
            }
            None => false,
        }
    }

    /// Returns false when no book has this id
    pub async fn delete(&self, id: &str) -> bool {
        let mut books = self.books.write().await;
        match books.iter().position(|b| b.id == id) {
            Some(index) => {
                books.remove(index);
                true
            }
            None => false,
        }
    }

    pub async fn count(&self) -> usize {
        self.books.read().await.len()
    }
}
