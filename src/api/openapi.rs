//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;

use crate::api::{books, health, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Personal Library REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "API root")
    ),
    paths(
        // Health
        health::api_root,
        health::health_check,
        health::readiness_check,
        // Users
        users::register,
        users::login,
        users::me,
        users::edit,
        users::delete_me,
        // Books
        books::register,
        books::list,
        books::edit,
        books::delete,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::RegisterUser,
            crate::models::user::LoginRequest,
            crate::models::user::UpdateProfile,
            users::RegisterResponse,
            users::LoginResponse,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            books::BookCreatedResponse,
            // Health
            health::HealthResponse,
            health::WelcomeResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Account registration and authentication"),
        (name = "books", description = "Personal book collection management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    // TEMP-BYPASS: SwaggerUi removed for offline build validation
    Router::new()
}
