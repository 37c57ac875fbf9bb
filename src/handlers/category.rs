use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::CategoryResponse;
use crate::response::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    #[serde(default)]
    pub sort: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub sort: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::validation_failed("Category name must not be empty"));
    }
    if name.chars().count() > 100 {
        return Err(ApiError::validation_failed("Category name is limited to 100 characters"));
    }
    Ok(())
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategory>,
) -> ApiResult<CategoryResponse> {
    validate_name(&payload.name)?;
    let category = state
        .db
        .create_category(payload.name.trim().to_string(), payload.sort)
        .await?;
    Ok(ApiResponse::created(CategoryResponse::from(&category)))
}

/// GET /api/categories
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<CategoryResponse>> {
    let categories = state.db.list_categories(query.search.as_deref()).await;
    Ok(ApiResponse::success(
        categories.iter().map(CategoryResponse::from).collect(),
    ))
}

/// GET /api/categories/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<CategoryResponse> {
    let category = state.db.find_category(id).await?;
    Ok(ApiResponse::success(CategoryResponse::from(&category)))
}

/// PATCH /api/categories/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCategory>,
) -> ApiResult<CategoryResponse> {
    if let Some(name) = &payload.name {
        validate_name(name)?;
    }
    let category = state
        .db
        .update_category(
            id,
            payload.name.map(|n| n.trim().to_string()),
            payload.sort,
            payload.is_active,
        )
        .await?;
    Ok(ApiResponse::success_msg(CategoryResponse::from(&category), "Category updated"))
}

/// DELETE /api/categories/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    state.db.delete_category(id).await?;
    Ok(ApiResponse::success_msg((), "Category deleted"))
}
