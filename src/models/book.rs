//! Book model

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

const MISSING_NAME: &str = "Mohon isi nama buku";
const READ_PAGE_OVERFLOW: &str = "readPage tidak boleh lebih besar dari pageCount";

/// Book record as stored and returned by `GET /books/{bookId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    /// Total number of pages
    pub page_count: Option<i64>,
    /// Pages read so far, never above `page_count`
    pub read_page: Option<i64>,
    /// `read_page == page_count` as of the last write
    pub finished: bool,
    /// Whether the book is currently being read
    pub reading: Option<bool>,
    pub inserted_at: String,
    pub updated_at: String,
}

impl Book {
    /// Build a new record from a validated payload
    pub fn new(id: String, payload: BookPayload, timestamp: String) -> Self {
        let finished = payload.is_finished();
        Self {
            id,
            name: payload.name.unwrap_or_default(),
            year: payload.year,
            author: payload.author,
            summary: payload.summary,
            publisher: payload.publisher,
            page_count: payload.page_count,
            read_page: payload.read_page,
            finished,
            reading: payload.reading,
            inserted_at: timestamp.clone(),
            updated_at: timestamp,
        }
    }

    /// Overwrite every mutable field from a validated payload.
    /// `id` and `inserted_at` are kept.
    pub fn apply(&mut self, payload: BookPayload, timestamp: String) {
        self.finished = payload.is_finished();
        self.name = payload.name.unwrap_or_default();
        self.year = payload.year;
        self.author = payload.author;
        self.summary = payload.summary;
        self.publisher = payload.publisher;
        self.page_count = payload.page_count;
        self.read_page = payload.read_page;
        self.reading = payload.reading;
        self.updated_at = timestamp;
    }
}

/// Short book representation for lists
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: Option<String>,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Create / update book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_page_progress"))]
pub struct BookPayload {
    #[validate(
        required(message = "Mohon isi nama buku"),
        length(min = 1, message = "Mohon isi nama buku")
    )]
    pub name: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: Option<i64>,
    pub read_page: Option<i64>,
    pub reading: Option<bool>,
}

impl BookPayload {
    /// Two absent page values compare equal, so a book without page
    /// information counts as finished.
    pub fn is_finished(&self) -> bool {
        self.page_count == self.read_page
    }
}

fn validate_page_progress(payload: &BookPayload) -> Result<(), ValidationError> {
    match (payload.read_page, payload.page_count) {
        (Some(read), Some(total)) if read > total => {
            let mut err = ValidationError::new("read_page_overflow");
            err.message = Some(READ_PAGE_OVERFLOW.into());
            Err(err)
        }
        _ => Ok(()),
    }
}

/// First human-readable message out of a validation report
pub fn validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| MISSING_NAME.to_string())
}

/// Query parameters for `GET /books`
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    /// "0" for books not being read, "1" for books being read
    pub reading: Option<String>,
    /// "0" for unfinished books, "1" for finished books
    pub finished: Option<String>,
}

impl BookQuery {
    /// Build from raw query pairs. A key given more than once has no single
    /// value and is left unset.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let single = |key: &str| {
            let mut values = pairs.iter().filter(|(k, _)| k == key).map(|(_, v)| v);
            match (values.next(), values.next()) {
                (Some(value), None) => Some(value.clone()),
                _ => None,
            }
        };
        Self {
            name: single("name"),
            reading: single("reading"),
            finished: single("finished"),
        }
    }
}

/// Tri-state boolean filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagFilter {
    #[default]
    Any,
    Only(bool),
}

impl FlagFilter {
    /// "0" and "1" constrain, anything else leaves the filter open
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("0") => FlagFilter::Only(false),
            Some("1") => FlagFilter::Only(true),
            _ => FlagFilter::Any,
        }
    }

    pub fn matches(self, value: Option<bool>) -> bool {
        match self {
            FlagFilter::Any => true,
            FlagFilter::Only(expected) => value == Some(expected),
        }
    }
}

/// Parsed list filters, applied as name -> reading -> finished
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    /// Lowercased name needle
    pub name: Option<String>,
    pub reading: FlagFilter,
    pub finished: FlagFilter,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        let name_ok = match &self.name {
            Some(needle) => book.name.to_lowercase().contains(needle.as_str()),
            None => true,
        };
        name_ok
            && self.reading.matches(book.reading)
            && self.finished.matches(Some(book.finished))
    }
}

impl From<&BookQuery> for BookFilter {
    fn from(query: &BookQuery) -> Self {
        Self {
            name: query
                .name
                .as_deref()
                .filter(|n| !n.is_empty())
                .map(str::to_lowercase),
            reading: FlagFilter::parse(query.reading.as_deref()),
            finished: FlagFilter::parse(query.finished.as_deref()),
        }
    }
}
