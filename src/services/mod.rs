//! Business logic services

pub mod borrows;

use std::sync::Arc;

use crate::repository::{BorrowStore, Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub borrows: borrows::BorrowsService,
}

impl Services {
    /// Create all services backed by the Postgres repository
    pub fn new(repository: Repository) -> Self {
        Self::with_store(Arc::new(repository.borrows))
    }

    /// Create all services on top of any borrow store
    pub fn with_store(store: Arc<dyn BorrowStore>) -> Self {
        Self {
            borrows: borrows::BorrowsService::new(store),
        }
    }
}
