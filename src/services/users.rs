//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{LoginRequest, RegisterUser, UpdateProfile, User, UserClaims},
    repository::Repository,
};

/// Hash a password using Argon2 with a fresh random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored Argon2 hash
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Successful login outcome
pub struct LoginOutcome {
    pub user_id: i32,
    pub token: String,
}

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user, returning its generated identifier
    pub async fn register(&self, request: RegisterUser) -> AppResult<i32> {
        let (name, email, password) = match (&request.name, &request.email, &request.password) {
            (Some(n), Some(e), Some(p)) if !n.is_empty() && !e.is_empty() && !p.is_empty() => {
                (n.clone(), e.clone(), p.clone())
            }
            _ => return Err(AppError::Validation("All fields are required!".to_string())),
        };
        request.validate()?;

        let password_hash = hash_password(&password)?;
        self.repository.users.create(&name, &email, &password_hash).await
    }

    /// Authenticate by email and password, issuing a bearer token
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginOutcome> {
        let (email, password) = match (&request.email, &request.password) {
            (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
            _ => {
                return Err(AppError::Validation(
                    "E-mail and password are required!".to_string(),
                ))
            }
        };

        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found!".to_string()))?;

        let stored_hash = user
            .password
            .as_deref()
            .ok_or_else(|| AppError::Authentication("Password is incorrect!".to_string()))?;
        if !verify_password(password, stored_hash)? {
            return Err(AppError::Authentication("Password is incorrect!".to_string()));
        }

        let claims = UserClaims::new(
            user.id,
            user.name.clone().unwrap_or_default(),
            user.email.clone().unwrap_or_default(),
        );
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok(LoginOutcome {
            user_id: user.id,
            token,
        })
    }

    /// Get the authenticated user's profile
    pub async fn get_profile(&self, user_id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(user_id).await
    }

    /// Apply a partial profile edit for the authenticated user
    pub async fn update_profile(&self, user_id: i32, profile: UpdateProfile) -> AppResult<User> {
        if profile.is_empty() {
            return Err(AppError::Validation(
                "At least one field is required!".to_string(),
            ));
        }
        profile.validate()?;

        if let Some(ref email) = profile.email {
            if self.repository.users.email_exists(email, Some(user_id)).await? {
                return Err(AppError::Conflict("E-mail already exists!".to_string()));
            }
        }

        let password_hash = match profile.password {
            Some(ref password) => Some(hash_password(password)?),
            None => None,
        };

        self.repository
            .users
            .update_profile(user_id, &profile, password_hash)
            .await
    }

    /// Delete the authenticated user's account along with all their books
    pub async fn delete_account(&self, user_id: i32) -> AppResult<()> {
        self.repository.users.delete(user_id).await
    }
}
