use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::TagResponse;
use crate::response::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTag {
    pub name: String,
    #[serde(default)]
    pub sort: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTag {
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
        return Err(ApiError::validation_failed("Tag name must not be empty"));
    }
    if name.chars().count() > 50 {
        return Err(ApiError::validation_failed("Tag name is limited to 50 characters"));
    }
    Ok(())
}

/// POST /api/tags
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateTag>,
) -> ApiResult<TagResponse> {
    validate_name(&payload.name)?;
    let tag = state.db.create_tag(payload.name.trim().to_string(), payload.sort).await?;
    Ok(ApiResponse::created(TagResponse::from(&tag)))
}

/// GET /api/tags
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<TagResponse>> {
    let tags = state.db.list_tags(query.search.as_deref()).await;
    Ok(ApiResponse::success(tags.iter().map(TagResponse::from).collect()))
}

/// GET /api/tags/popular
pub async fn popular(State(state): State<AppState>) -> ApiResult<Vec<TagResponse>> {
    let tags = state.db.popular_tags(10).await;
    Ok(ApiResponse::success(tags.iter().map(TagResponse::from).collect()))
}

/// GET /api/tags/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<TagResponse> {
    let tag = state.db.find_tag(id).await?;
    Ok(ApiResponse::success(TagResponse::from(&tag)))
}

/// PATCH /api/tags/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTag>,
) -> ApiResult<TagResponse> {
    if let Some(name) = &payload.name {
        validate_name(name)?;
    }
    let tag = state
        .db
        .update_tag(id, payload.name.map(|n| n.trim().to_string()), payload.sort, payload.is_active)
        .await?;
    Ok(ApiResponse::success_msg(TagResponse::from(&tag), "Tag updated"))
}

/// DELETE /api/tags/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    state.db.delete_tag(id).await?;
    Ok(ApiResponse::success_msg((), "Tag deleted"))
}
