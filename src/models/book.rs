//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult, QuotaKind};

/// Genres subject to a dedicated per-user quota
pub const GENRE_BIOGRAPHY: &str = "Biography";
pub const GENRE_SCIENCE_FICTION: &str = "Science Fiction";

/// Per-user registration caps
pub const MAX_BOOKS_PER_USER: i64 = 5;
pub const MAX_BIOGRAPHY_PER_USER: i64 = 2;
pub const MAX_SCIENCE_FICTION_PER_USER: i64 = 3;

/// Full book model from database
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub year: i32,
    /// Free-text genre; "Biography" and "Science Fiction" carry quotas
    pub genre: String,
    /// Free-text reading status, unset on registration
    pub status: Option<String>,
    pub user_id: i32,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Book registration request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
}

/// Book edit request (any subset of fields)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub status: Option<String>,
}

impl UpdateBook {
    /// True when no field was supplied at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.year.is_none()
            && self.genre.is_none()
            && self.status.is_none()
    }
}

/// Book list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive substring match on title
    pub title: Option<String>,
    /// Case-insensitive substring match on author
    pub author: Option<String>,
    /// Exact genre match
    pub genre: Option<String>,
    /// Exact status match
    pub status: Option<String>,
}

/// Aggregate of a user's book counts, read in a single query
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct GenreCounts {
    pub total: i64,
    pub biography: i64,
    pub science_fiction: i64,
}

impl GenreCounts {
    /// Check whether one more book of `genre` fits within the user's quotas
    pub fn ensure_allows(&self, genre: &str) -> AppResult<()> {
        if self.total >= MAX_BOOKS_PER_USER {
            return Err(AppError::Quota(QuotaKind::Total));
        }
        if genre == GENRE_BIOGRAPHY && self.biography >= MAX_BIOGRAPHY_PER_USER {
            return Err(AppError::Quota(QuotaKind::Biography));
        }
        if genre == GENRE_SCIENCE_FICTION && self.science_fiction >= MAX_SCIENCE_FICTION_PER_USER {
            return Err(AppError::Quota(QuotaKind::ScienceFiction));
        }
        Ok(())
    }

    /// Counts as they would be with one book of `genre` removed.
    ///
    /// An edit conceptually removes the book's current genre before the new
    /// one is applied, otherwise a user at the Biography cap could never edit
    /// an existing Biography record.
    pub fn without(&self, genre: &str) -> Self {
        Self {
            total: self.total - 1,
            biography: if genre == GENRE_BIOGRAPHY {
                self.biography - 1
            } else {
                self.biography
            },
            science_fiction: if genre == GENRE_SCIENCE_FICTION {
                self.science_fiction - 1
            } else {
                self.science_fiction
            },
        }
    }
}
