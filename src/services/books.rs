//! Book management service and registration rules

use chrono::{DateTime, Datelike, Utc};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
};

/// Validated field values for a book registration
struct NewBook {
    title: String,
    author: String,
    year: i32,
    genre: String,
}

fn validate_title(title: &str) -> AppResult<()> {
    if title.chars().count() < 2 {
        return Err(AppError::Validation(
            "Title must be at least 2 characters long!".to_string(),
        ));
    }
    Ok(())
}

fn validate_year(year: i32) -> AppResult<()> {
    if year > Utc::now().year() {
        return Err(AppError::Validation(
            "Year cannot be in the future!".to_string(),
        ));
    }
    Ok(())
}

fn validate_new_book(book: &CreateBook) -> AppResult<NewBook> {
    let (title, author, year, genre) = match (&book.title, &book.author, book.year, &book.genre) {
        (Some(t), Some(a), Some(y), Some(g)) if !t.is_empty() && !a.is_empty() && !g.is_empty() => {
            (t.clone(), a.clone(), y, g.clone())
        }
        _ => return Err(AppError::Validation("All fields are required!".to_string())),
    };
    validate_title(&title)?;
    validate_year(year)?;

    Ok(NewBook {
        title,
        author,
        year,
        genre,
    })
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a book for the caller, enforcing per-user quotas
    pub async fn register(
        &self,
        user_id: i32,
        book: CreateBook,
    ) -> AppResult<(i32, DateTime<Utc>)> {
        let book = validate_new_book(&book)?;

        self.repository
            .books
            .create(user_id, &book.title, &book.author, book.year, &book.genre)
            .await
    }

    /// List the caller's books, optionally filtered
    pub async fn list(&self, user_id: i32, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.list_by_owner(user_id, query).await
    }

    /// Apply a partial edit to one of the caller's books
    pub async fn edit(&self, user_id: i32, book_id: i32, book: UpdateBook) -> AppResult<Book> {
        if book.is_empty() {
            return Err(AppError::Validation(
                "At least one field is required!".to_string(),
            ));
        }
        if let Some(ref title) = book.title {
            validate_title(title)?;
        }
        if let Some(year) = book.year {
            validate_year(year)?;
        }

        self.repository.books.update(user_id, book_id, &book).await
    }

    /// Delete one of the caller's books
    pub async fn delete(&self, user_id: i32, book_id: i32) -> AppResult<()> {
        self.repository.books.delete(user_id, book_id).await
    }
}
