//! User account endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{LoginRequest, RegisterUser, UpdateProfile, User},
};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    /// Identifier of the created user
    pub id: i32,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub id_user: i32,
    /// Bearer token, valid for one hour
    pub token: String,
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "users",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Missing field, short password or duplicate email")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let id = state.services.users.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully!".to_string(),
            id,
        }),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "No user with that email")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let outcome = state.services.users.login(request).await?;

    Ok(Json(LoginResponse {
        message: "Login successful!".to_string(),
        id_user: outcome.user_id,
        token: outcome.token,
    }))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current profile", body = User),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_profile(claims.user_id).await?;
    Ok(Json(user))
}

/// Update the authenticated user's profile
#[utoipa::path(
    put,
    path = "/users/edit",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "No field supplied or invalid value"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn edit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(profile): Json<UpdateProfile>,
) -> AppResult<Json<User>> {
    let updated = state
        .services
        .users
        .update_profile(claims.user_id, profile)
        .await?;
    Ok(Json(updated))
}

/// Delete the authenticated user's account and all their books
#[utoipa::path(
    delete,
    path = "/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn delete_me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<StatusCode> {
    state.services.users.delete_account(claims.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
