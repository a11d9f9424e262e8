//! Book collection endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct BookCreatedResponse {
    pub message: String,
    pub id_book: i32,
    pub id_user: i32,
    pub create_date: DateTime<Utc>,
}

/// Register a book in the caller's collection
#[utoipa::path(
    post,
    path = "/books/register",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookCreatedResponse),
        (status = 400, description = "Invalid field, quota exceeded or duplicate title/author"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookCreatedResponse>)> {
    let (id_book, create_date) = state.services.books.register(claims.user_id, book).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookCreatedResponse {
            message: "Book created successfully!".to_string(),
            id_book,
            id_user: claims.user_id,
            create_date,
        }),
    ))
}

/// List the caller's books, with optional filters
#[utoipa::path(
    get,
    path = "/books/list",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "The caller's books", body = [Book]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list(claims.user_id, &query).await?;
    Ok(Json(books))
}

/// Edit one of the caller's books
#[utoipa::path(
    put,
    path = "/books/edit/{id_book}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id_book" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid field, quota exceeded or duplicate title/author"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found or not owned by caller")
    )
)]
pub async fn edit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id_book): Path<i32>,
    Json(book): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    let updated = state
        .services
        .books
        .edit(claims.user_id, id_book, book)
        .await?;
    Ok(Json(updated))
}

/// Delete one of the caller's books
#[utoipa::path(
    delete,
    path = "/books/{id_book}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id_book" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found or not owned by caller")
    )
)]
pub async fn delete(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id_book): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.books.delete(claims.user_id, id_book).await?;
    Ok(StatusCode::NO_CONTENT)
}
