//! Books repository for database operations
//!
//! Quota-sensitive mutations (create, genre edit) run inside a transaction
//! holding a per-user advisory lock, so the aggregate count read and the
//! write cannot interleave with a concurrent registration by the same user.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, GenreCounts, UpdateBook, GENRE_BIOGRAPHY, GENRE_SCIENCE_FICTION},
    repository::conflict_on_unique,
};

/// Advisory lock namespace for per-user book mutations
const BOOKS_LOCK_SPACE: i32 = 1;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Serialize quota-checked mutations for one user within `tx`
    async fn lock_user(tx: &mut Transaction<'_, Postgres>, user_id: i32) -> AppResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
            .bind(BOOKS_LOCK_SPACE)
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Read total/biography/science-fiction counts in a single aggregate query
    async fn genre_counts(
        tx: &mut Transaction<'_, Postgres>,
        user_id: i32,
    ) -> AppResult<GenreCounts> {
        let counts = sqlx::query_as::<_, GenreCounts>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE genre = $1) AS biography,
                   COUNT(*) FILTER (WHERE genre = $2) AS science_fiction
            FROM books
            WHERE user_id = $3
            "#,
        )
        .bind(GENRE_BIOGRAPHY)
        .bind(GENRE_SCIENCE_FICTION)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(counts)
    }

    /// Register a book after re-checking the owner's quotas under lock
    pub async fn create(
        &self,
        user_id: i32,
        title: &str,
        author: &str,
        year: i32,
        genre: &str,
    ) -> AppResult<(i32, DateTime<Utc>)> {
        let mut tx = self.pool.begin().await?;
        Self::lock_user(&mut tx, user_id).await?;

        let counts = Self::genre_counts(&mut tx, user_id).await?;
        counts.ensure_allows(genre)?;

        let now = Utc::now();
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (title, author, year, genre, user_id, crea_date, modif_date)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id
            "#,
        )
        .bind(title)
        .bind(author)
        .bind(year)
        .bind(genre)
        .bind(user_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "Book already exists!"))?;

        tx.commit().await?;
        Ok((id, now))
    }

    /// List the owner's books, optionally filtered
    pub async fn list_by_owner(&self, user_id: i32, query: &BookQuery) -> AppResult<Vec<Book>> {
        let mut conditions = vec!["user_id = $1".to_string()];
        let mut params: Vec<String> = Vec::new();

        if let Some(ref title) = query.title {
            params.push(format!("%{}%", title.to_lowercase()));
            conditions.push(format!("LOWER(title) LIKE ${}", params.len() + 1));
        }
        if let Some(ref author) = query.author {
            params.push(format!("%{}%", author.to_lowercase()));
            conditions.push(format!("LOWER(author) LIKE ${}", params.len() + 1));
        }
        if let Some(ref genre) = query.genre {
            params.push(genre.clone());
            conditions.push(format!("genre = ${}", params.len() + 1));
        }
        if let Some(ref status) = query.status {
            params.push(status.clone());
            conditions.push(format!("status = ${}", params.len() + 1));
        }

        let select_query = format!(
            "SELECT * FROM books WHERE {} ORDER BY id",
            conditions.join(" AND ")
        );

        let mut builder = sqlx::query_as::<_, Book>(&select_query).bind(user_id);
        for param in &params {
            builder = builder.bind(param);
        }
        let books = builder.fetch_all(&self.pool).await?;

        Ok(books)
    }

    /// Get a book owned by the caller
    pub async fn get_owned(&self, user_id: i32, book_id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 AND user_id = $2")
            .bind(book_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found!".to_string()))
    }

    /// Apply a partial edit to an owned book, re-checking genre quotas
    /// against counts with the book's current genre subtracted.
    pub async fn update(
        &self,
        user_id: i32,
        book_id: i32,
        book: &UpdateBook,
    ) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;
        Self::lock_user(&mut tx, user_id).await?;

        let current = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE id = $1 AND user_id = $2",
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found!".to_string()))?;

        if let Some(ref genre) = book.genre {
            let counts = Self::genre_counts(&mut tx, user_id).await?;
            counts.without(&current.genre).ensure_allows(genre)?;
        }

        let now = Utc::now();

        // Build dynamic update query
        let mut sets = vec!["modif_date = $1".to_string()];
        let mut param_idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_field!(book.title, "title");
        add_field!(book.author, "author");
        add_field!(book.year, "year");
        add_field!(book.genre, "genre");
        add_field!(book.status, "status");

        let update_query = format!(
            "UPDATE books SET {} WHERE id = ${} AND user_id = ${}",
            sets.join(", "),
            param_idx,
            param_idx + 1
        );

        let mut builder = sqlx::query(&update_query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(book.title);
        bind_field!(book.author);
        bind_field!(book.year);
        bind_field!(book.genre);
        bind_field!(book.status);

        let result = builder
            .bind(book_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, "Book already exists!"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Book not found!".to_string()));
        }

        tx.commit().await?;

        self.get_owned(user_id, book_id).await
    }

    /// Delete an owned book
    pub async fn delete(&self, user_id: i32, book_id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1 AND user_id = $2")
            .bind(book_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Book not found!".to_string()));
        }

        Ok(())
    }
}
