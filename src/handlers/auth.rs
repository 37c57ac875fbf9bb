use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::auth::service::{self, LoginResponse};
use crate::auth::{Principal, Role};
use crate::error::ApiError;
use crate::models::UserSummary;
use crate::response::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/auth/login - Admin login with username/password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }
    let result = service::login_admin(&state.db, payload.username.trim(), &payload.password).await?;
    Ok(ApiResponse::success_msg(result, "Login succeeded"))
}

/// POST /api/auth/guest - Issue a read-only guest credential
pub async fn guest(State(state): State<AppState>) -> ApiResult<LoginResponse> {
    let result = service::guest_access(&state.db).await?;
    Ok(ApiResponse::success_msg(result, "Guest access token issued"))
}

/// GET /api/auth/profile - Current principal, straight from the credential
pub async fn profile(Extension(principal): Extension<Principal>) -> ApiResult<UserSummary> {
    Ok(ApiResponse::success(UserSummary {
        id: principal.id,
        username: principal.name,
        role: principal.role,
    }))
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub valid: bool,
    pub role: Role,
}

/// GET /api/auth/check - Reaching this handler means the credential passed
/// the chain; report validity and role.
pub async fn check(Extension(principal): Extension<Principal>) -> ApiResult<CheckResponse> {
    Ok(ApiResponse::success_msg(
        CheckResponse { valid: true, role: principal.role },
        "Credential is valid",
    ))
}
