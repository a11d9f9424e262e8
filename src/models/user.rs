//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Bearer tokens are valid for exactly one hour; there is no refresh.
pub const TOKEN_VALIDITY_SECS: i64 = 3600;

/// User account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum UserStatus {
    Active = 0,
    Deleted = 2,
}

impl From<i16> for UserStatus {
    fn from(v: i16) -> Self {
        match v {
            2 => UserStatus::Deleted,
            _ => UserStatus::Active,
        }
    }
}

/// Full user model from database
///
/// Name, email and password are nullable because account deletion anonymizes
/// the row in place instead of removing it.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: Option<String>,
    pub email: Option<String>,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: Option<String>,
    #[serde(skip_serializing)]
    pub status: i16,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Registration request
///
/// Fields are optional so that a missing field surfaces as a 400 validation
/// error rather than a body-deserialization rejection.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long!"))]
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Update own profile request (any subset of fields)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long!"))]
    pub password: Option<String>,
}

impl UpdateProfile {
    /// True when no field was supplied at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}

/// JWT claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Build claims for a freshly authenticated user
    pub fn new(user_id: i32, name: String, email: String) -> Self {
        let iat = Utc::now().timestamp();
        Self {
            sub: email.clone(),
            user_id,
            name,
            email,
            exp: iat + TOKEN_VALIDITY_SECS,
            iat,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
