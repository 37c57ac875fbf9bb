use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::auth::service::password_digest;
use crate::auth::Role;
use crate::error::ApiError;
use crate::models::UserResponse;
use crate::response::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password: Option<String>,
    pub email: Option<String>,
    pub nickname: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Admin
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

/// GET /api/users
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<UserResponse>> {
    let users = state.db.list_users().await;
    Ok(ApiResponse::success(users.iter().map(UserResponse::from).collect()))
}

/// GET /api/users/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<UserResponse> {
    let user = state.db.find_user(id).await?;
    Ok(ApiResponse::success(UserResponse::from(&user)))
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> ApiResult<UserResponse> {
    let username = payload.username.trim();
    if username.is_empty() || username.chars().count() > 50 {
        return Err(ApiError::validation_failed("Username must be 1-50 characters"));
    }
    // Admin accounts authenticate with a password; guest accounts carry none
    let digest = match (payload.role, &payload.password) {
        (Role::Admin, Some(password)) if !password.is_empty() => Some(password_digest(password)),
        (Role::Admin, _) => {
            return Err(ApiError::validation_failed("Admin accounts require a password"))
        }
        (Role::Guest, _) => None,
    };
    let user = state
        .db
        .create_user(username.to_string(), payload.email, payload.nickname, digest, payload.role)
        .await?;
    Ok(ApiResponse::created(UserResponse::from(&user)))
}

/// PATCH /api/users/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUser>,
) -> ApiResult<UserResponse> {
    let user = state
        .db
        .update_user(id, payload.nickname, payload.email, payload.is_active)
        .await?;
    Ok(ApiResponse::success_msg(UserResponse::from(&user), "User updated"))
}

/// DELETE /api/users/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    state.db.delete_user(id).await?;
    Ok(ApiResponse::success_msg((), "User deleted"))
}
