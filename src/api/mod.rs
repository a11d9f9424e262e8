//! API handlers for the Libris REST endpoints

pub mod books;
pub mod health;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::errors::ErrorKind;

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for the authenticated user from a bearer JWT.
///
/// Rejects with 401 before any handler logic runs when the header is absent,
/// malformed, or carries an invalid or expired token.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Check for Bearer token
        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Authentication(
                "Invalid authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];

        // Validate JWT token using the secret from configuration
        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Authentication("Token expired".to_string()),
                _ => AppError::Authentication("Invalid token".to_string()),
            }
        })?;

        Ok(AuthenticatedUser(claims))
    }
}
