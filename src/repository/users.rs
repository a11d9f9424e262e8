//! Users repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{UpdateProfile, User, UserStatus},
    repository::conflict_on_unique,
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get an active user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1 AND status != $2",
        )
        .bind(id)
        .bind(UserStatus::Deleted as i16)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found!".to_string()))
    }

    /// Get an active user by email (primary authentication lookup)
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(email) = LOWER($1) AND status != $2",
        )
        .bind(email)
        .bind(UserStatus::Deleted as i16)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND id != $2)",
            )
            .bind(email)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a new user, returning its generated identifier
    pub async fn create(&self, name: &str, email: &str, password_hash: &str) -> AppResult<i32> {
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (name, email, password, status, crea_date, modif_date)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(UserStatus::Active as i16)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "E-mail already exists!"))?;

        Ok(id)
    }

    /// Update the user's own profile from the supplied subset of fields
    pub async fn update_profile(
        &self,
        id: i32,
        profile: &UpdateProfile,
        password_hash: Option<String>,
    ) -> AppResult<User> {
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

        add_field!(profile.name, "name");
        add_field!(profile.email, "email");

        if password_hash.is_some() {
            sets.push(format!("password = ${}", param_idx));
            param_idx += 1;
        }

        let query = format!(
            "UPDATE users SET {} WHERE id = ${} AND status != ${}",
            sets.join(", "),
            param_idx,
            param_idx + 1
        );

        let mut builder = sqlx::query(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(profile.name);
        bind_field!(profile.email);

        if let Some(ref hash) = password_hash {
            builder = builder.bind(hash);
        }

        let result = builder
            .bind(id)
            .bind(UserStatus::Deleted as i16)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "E-mail already exists!"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found!".to_string()));
        }

        self.get_by_id(id).await
    }

    /// Delete a user: drop all their books, then anonymize the row in place
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM books WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = NULL,
                email = NULL,
                password = NULL,
                status = $1,
                archived_date = $2,
                modif_date = $2
            WHERE id = $3 AND status != $1
            "#,
        )
        .bind(UserStatus::Deleted as i16)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found!".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }
}
