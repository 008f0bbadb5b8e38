//! Borrow (loan) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Borrow row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Borrow {
    pub id: i64,
    pub reader_id: i64,
    pub book_id: i64,
    pub borrow_time: NaiveDate,
    /// `None` while the book is still out
    pub return_time: Option<NaiveDate>,
}

/// Create borrow request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
pub struct CreateBorrow {
    /// Reader ID
    pub reader_id: i64,
    /// Book ID
    pub book_id: i64,
}

/// The reader/book pair echoed back after a successful borrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewBorrow {
    pub reader_id: i64,
    pub book_id: i64,
}

impl From<&Borrow> for NewBorrow {
    fn from(borrow: &Borrow) -> Self {
        Self {
            reader_id: borrow.reader_id,
            book_id: borrow.book_id,
        }
    }
}

/// Outstanding borrow joined with reader, book and author names.
///
/// Names are `None` when the referenced row no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActiveBorrow {
    pub reader: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    #[schema(value_type = String, format = Date)]
    pub borrow_time: NaiveDate,
}
