//! Borrows repository for database operations

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::borrow::{ActiveBorrow, Borrow},
};

/// Storage operations the borrow service relies on.
///
/// Every method is a single round-trip; none of them validate their inputs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowStore: Send + Sync {
    async fn book_exists(&self, book_id: i64) -> AppResult<bool>;

    async fn reader_exists(&self, reader_id: i64) -> AppResult<bool>;

    /// Whether `reader_id` currently holds `book_id`
    async fn has_active_borrow_by(&self, reader_id: i64, book_id: i64) -> AppResult<bool>;

    /// Whether anyone currently holds `book_id`
    async fn has_active_borrow(&self, book_id: i64) -> AppResult<bool>;

    /// Insert an active borrow. Returns `None` if the store already holds an
    /// active borrow for the book.
    async fn insert_active(
        &self,
        reader_id: i64,
        book_id: i64,
        borrow_time: NaiveDate,
    ) -> AppResult<Option<Borrow>>;

    /// Close every active borrow of `book_id`, returning how many were closed.
    async fn close_active(&self, book_id: i64, return_time: NaiveDate) -> AppResult<u64>;

    async fn list_active(&self) -> AppResult<Vec<ActiveBorrow>>;

    async fn ping(&self) -> AppResult<()>;
}

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BorrowStore for BorrowsRepository {
    async fn book_exists(&self, book_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn reader_exists(&self, reader_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM readers WHERE id = $1)")
            .bind(reader_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn has_active_borrow_by(&self, reader_id: i64, book_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM borrows
                WHERE reader_id = $1 AND book_id = $2 AND return_time IS NULL
            )
            "#,
        )
        .bind(reader_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn has_active_borrow(&self, book_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM borrows WHERE book_id = $1 AND return_time IS NULL)",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert_active(
        &self,
        reader_id: i64,
        book_id: i64,
        borrow_time: NaiveDate,
    ) -> AppResult<Option<Borrow>> {
        // borrows_one_active_per_book turns a lost race into an empty result
        let borrow = sqlx::query_as::<_, Borrow>(
            r#"
            INSERT INTO borrows (reader_id, book_id, borrow_time, return_time)
            VALUES ($1, $2, $3, NULL)
            ON CONFLICT (book_id) WHERE return_time IS NULL DO NOTHING
            RETURNING id, reader_id, book_id, borrow_time, return_time
            "#,
        )
        .bind(reader_id)
        .bind(book_id)
        .bind(borrow_time)
        .fetch_optional(&self.pool)
        .await?;

        Ok(borrow)
    }

    async fn close_active(&self, book_id: i64, return_time: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE borrows
            SET return_time = $1
            WHERE book_id = $2 AND return_time IS NULL
            "#,
        )
        .bind(return_time)
        .bind(book_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_active(&self) -> AppResult<Vec<ActiveBorrow>> {
        let borrows = sqlx::query_as::<_, ActiveBorrow>(
            r#"
            SELECT readers.name AS reader,
                   books.title AS title,
                   authors.name AS author,
                   borrows.borrow_time
            FROM borrows
            LEFT JOIN books ON books.id = borrows.book_id
            LEFT JOIN authors ON authors.id = books.author_id
            LEFT JOIN readers ON readers.id = borrows.reader_id
            WHERE borrows.return_time IS NULL
            ORDER BY borrows.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(borrows)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
