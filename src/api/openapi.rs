//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{borrows, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "1.0.0",
        description = "Borrow and return books",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/v1", description = "API v1")
    ),
    paths(
        health::health_check,
        health::readiness_check,
        borrows::create_borrow,
        borrows::return_borrow,
        borrows::list_borrows,
    ),
    components(
        schemas(
            health::HealthResponse,
            borrows::CreateBorrowResponse,
            borrows::ReturnResponse,
            borrows::BorrowListResponse,
            crate::models::borrow::CreateBorrow,
            crate::models::borrow::NewBorrow,
            crate::models::borrow::ActiveBorrow,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Liveness and readiness"),
        (name = "borrows", description = "Book loans")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
