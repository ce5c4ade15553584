//! Repository layer for in-memory storage

pub mod books;

/// Container for all stores, created once at start-up
#[derive(Clone, Default)]
pub struct Repository {
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            books: books::BooksRepository::new(),
        }
    }
}
