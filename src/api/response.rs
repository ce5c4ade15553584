//! Uniform response envelope: `{status, message?, data?}`

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::book::{Book, BookSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Fail,
}

/// Response envelope shared by every book endpoint
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    BookIdResponse = ApiResponse<BookIdData>,
    BookListResponse = ApiResponse<BookListData>,
    BookResponse = ApiResponse<BookData>,
    MessageResponse = ApiResponse<Empty>
)]
pub struct ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<Empty> {
    /// Success without data
    pub fn ack(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Fail,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Placeholder for envelopes without data
#[derive(Debug, Serialize, ToSchema)]
pub struct Empty {}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookIdData {
    pub book_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookListData {
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookData {
    pub book: Book,
}
