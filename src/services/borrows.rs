//! Borrow management service
//!
//! A borrow request goes through [`CREATE_BORROW_RULES`] in order; the first
//! rule that fails decides the outcome and no later rule touches the store.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::{
    error::{AppError, AppResult, ReferenceKind},
    models::borrow::{ActiveBorrow, CreateBorrow, NewBorrow},
    repository::BorrowStore,
};

pub const BORROW_ADDED: &str = "Borrow added successfully";
pub const ALREADY_BORROWED_BY_SAME_READER: &str = "The book is already borrowed by the same reader";
pub const ALREADY_BORROWED_BY_SOMEONE_ELSE: &str = "The book is already borrowed by someone else";

/// Preconditions of a new borrow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowRule {
    BookExists,
    ReaderExists,
    NotHeldBySameReader,
    NotHeldByAnotherReader,
}

/// Evaluation order of the borrow preconditions
pub const CREATE_BORROW_RULES: [BorrowRule; 4] = [
    BorrowRule::BookExists,
    BorrowRule::ReaderExists,
    BorrowRule::NotHeldBySameReader,
    BorrowRule::NotHeldByAnotherReader,
];

/// Why a borrow request was not turned into a new row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    InvalidReference(ReferenceKind),
    AlreadyBorrowedBySameReader,
    Conflict,
}

/// Successful result of a borrow request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowOutcome {
    Created(NewBorrow),
    /// The reader already holds the book; nothing was written.
    AlreadyBorrowedBySameReader,
}

impl BorrowRule {
    async fn check(self, store: &dyn BorrowStore, request: CreateBorrow) -> AppResult<Option<Rejection>> {
        let CreateBorrow { reader_id, book_id } = request;

        let rejection = match self {
            BorrowRule::BookExists => (!store.book_exists(book_id).await?)
                .then_some(Rejection::InvalidReference(ReferenceKind::Book)),
            BorrowRule::ReaderExists => (!store.reader_exists(reader_id).await?)
                .then_some(Rejection::InvalidReference(ReferenceKind::Reader)),
            BorrowRule::NotHeldBySameReader => store
                .has_active_borrow_by(reader_id, book_id)
                .await?
                .then_some(Rejection::AlreadyBorrowedBySameReader),
            BorrowRule::NotHeldByAnotherReader => store
                .has_active_borrow(book_id)
                .await?
                .then_some(Rejection::Conflict),
        };

        Ok(rejection)
    }
}

impl Rejection {
    fn into_outcome(self) -> AppResult<BorrowOutcome> {
        match self {
            Rejection::InvalidReference(kind) => Err(AppError::InvalidReference(kind)),
            Rejection::AlreadyBorrowedBySameReader => Ok(BorrowOutcome::AlreadyBorrowedBySameReader),
            Rejection::Conflict => Err(AppError::Conflict(ALREADY_BORROWED_BY_SOMEONE_ELSE.to_string())),
        }
    }
}

/// Run the borrow rules in order and return the first one that fails.
pub async fn first_rejection(store: &dyn BorrowStore, request: CreateBorrow) -> AppResult<Option<Rejection>> {
    for rule in CREATE_BORROW_RULES {
        if let Some(rejection) = rule.check(store, request).await? {
            tracing::debug!("Borrow of book {} by reader {} rejected by {:?}", request.book_id, request.reader_id, rule);
            return Ok(Some(rejection));
        }
    }
    Ok(None)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Clone)]
pub struct BorrowsService {
    store: Arc<dyn BorrowStore>,
}

impl BorrowsService {
    pub fn new(store: Arc<dyn BorrowStore>) -> Self {
        Self { store }
    }

    /// Lend a book to a reader
    pub async fn create_borrow(&self, request: CreateBorrow) -> AppResult<BorrowOutcome> {
        if let Some(rejection) = first_rejection(self.store.as_ref(), request).await? {
            return rejection.into_outcome();
        }

        let inserted = self
            .store
            .insert_active(request.reader_id, request.book_id, today())
            .await?;

        match inserted {
            Some(borrow) => {
                tracing::debug!("New borrow from reader id {}", borrow.reader_id);
                Ok(BorrowOutcome::Created(NewBorrow::from(&borrow)))
            }
            None => {
                // Another request took the book between the checks and the insert
                tracing::warn!("Book {} was borrowed concurrently", request.book_id);
                let rejection = if self
                    .store
                    .has_active_borrow_by(request.reader_id, request.book_id)
                    .await?
                {
                    Rejection::AlreadyBorrowedBySameReader
                } else {
                    Rejection::Conflict
                };
                rejection.into_outcome()
            }
        }
    }

    /// Mark a book as returned. Succeeds even if the book was not out.
    pub async fn return_borrow(&self, book_id: i64) -> AppResult<u64> {
        let closed = self.store.close_active(book_id, today()).await?;
        tracing::debug!("Book {} returned ({} borrow(s) closed)", book_id, closed);
        Ok(closed)
    }

    /// List outstanding borrows
    pub async fn list_active(&self) -> AppResult<Vec<ActiveBorrow>> {
        self.store.list_active().await
    }

    /// Check that the store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
