//! Repository layer for database operations

pub mod borrows;

use sqlx::{Pool, Postgres};

pub use borrows::{BorrowStore, BorrowsRepository};

/// Main repository struct holding one repository per table group
#[derive(Clone)]
pub struct Repository {
    pub borrows: BorrowsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            borrows: BorrowsRepository::new(pool),
        }
    }
}
