//! Borrow endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{ActiveBorrow, CreateBorrow, NewBorrow},
    services::borrows::{BorrowOutcome, ALREADY_BORROWED_BY_SAME_READER, BORROW_ADDED},
    AppState,
};

/// Body returned by `POST /borrows`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CreateBorrowResponse {
    Created { message: String, borrow: NewBorrow },
    /// The reader already holds the book
    AlreadyBorrowed { detail: String },
}

impl From<BorrowOutcome> for CreateBorrowResponse {
    fn from(outcome: BorrowOutcome) -> Self {
        match outcome {
            BorrowOutcome::Created(borrow) => CreateBorrowResponse::Created {
                message: BORROW_ADDED.to_string(),
                borrow,
            },
            BorrowOutcome::AlreadyBorrowedBySameReader => CreateBorrowResponse::AlreadyBorrowed {
                detail: ALREADY_BORROWED_BY_SAME_READER.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReturnResponse {
    pub message: String,
    /// Number of borrows closed (0 if the book was not out)
    pub returned: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BorrowListResponse {
    pub borrows: Vec<ActiveBorrow>,
}

/// Lend a book to a reader
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    request_body = CreateBorrow,
    responses(
        (status = 200, description = "Borrow created, or already held by the same reader", body = CreateBorrowResponse),
        (status = 400, description = "Unknown reader_id or book_id, or malformed body", body = crate::error::ErrorResponse),
        (status = 409, description = "Book borrowed by someone else", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_borrow(
    State(state): State<AppState>,
    payload: Result<Json<CreateBorrow>, JsonRejection>,
) -> AppResult<Json<CreateBorrowResponse>> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let outcome = state.services.borrows.create_borrow(request).await?;
    Ok(Json(outcome.into()))
}

/// Return a borrowed book
#[utoipa::path(
    delete,
    path = "/borrows/{book_id}",
    tag = "borrows",
    params(
        ("book_id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book returned (also when it was not out)", body = ReturnResponse),
        (status = 400, description = "book_id is not an integer", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_borrow(
    State(state): State<AppState>,
    book_id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<ReturnResponse>> {
    let Path(book_id) = book_id.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let returned = state.services.borrows.return_borrow(book_id).await?;

    Ok(Json(ReturnResponse {
        message: "Book returned".to_string(),
        returned,
    }))
}

/// List books currently out
#[utoipa::path(
    get,
    path = "/borrows",
    tag = "borrows",
    responses(
        (status = 200, description = "Outstanding borrows", body = BorrowListResponse)
    )
)]
pub async fn list_borrows(State(state): State<AppState>) -> AppResult<Json<BorrowListResponse>> {
    let borrows = state.services.borrows.list_active().await?;
    Ok(Json(BorrowListResponse { borrows }))
}
