use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::models::{ArticleResponse, ArticleStatus};
use crate::response::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticle {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    /// Present-but-null moves the article out of its category
    #[serde(default, with = "double_option")]
    pub category_id: Option<Option<i64>>,
    pub status: Option<ArticleStatus>,
}

// Distinguishes an absent field from an explicit null
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(de: D) -> Result<Option<Option<i64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<i64>::deserialize(de).map(Some)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<ArticleStatus>,
}

fn validate(title: Option<&str>, content: Option<&str>) -> Result<(), ApiError> {
    if let Some(title) = title {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::validation_failed("Article title must not be empty"));
        }
        if title.chars().count() > 200 {
            return Err(ApiError::validation_failed("Article title is limited to 200 characters"));
        }
    }
    if let Some(content) = content {
        if content.trim().is_empty() {
            return Err(ApiError::validation_failed("Article content must not be empty"));
        }
    }
    Ok(())
}

/// POST /api/articles - author is always the authenticated principal
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateArticle>,
) -> ApiResult<ArticleResponse> {
    validate(Some(&payload.title), Some(&payload.content))?;
    let article = state
        .db
        .create_article(
            payload.title.trim().to_string(),
            payload.content,
            payload.summary,
            principal.id,
            payload.category_id,
            payload.tag_ids,
            payload.publish,
        )
        .await?;
    Ok(ApiResponse::created(ArticleResponse::from(&article)))
}

/// GET /api/articles
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<ArticleResponse>> {
    let articles = state.db.list_articles(query.status).await;
    Ok(ApiResponse::success(articles.iter().map(ArticleResponse::from).collect()))
}

/// GET /api/articles/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ArticleResponse> {
    let article = state.db.find_article(id).await?;
    Ok(ApiResponse::success(ArticleResponse::from(&article)))
}

/// PATCH /api/articles/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateArticle>,
) -> ApiResult<ArticleResponse> {
    validate(payload.title.as_deref(), payload.content.as_deref())?;
    let article = state
        .db
        .update_article(
            id,
            payload.title.map(|t| t.trim().to_string()),
            payload.content,
            payload.summary,
            payload.category_id,
            payload.status,
        )
        .await?;
    Ok(ApiResponse::success_msg(ArticleResponse::from(&article), "Article updated"))
}

/// DELETE /api/articles/:id - soft delete
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    state.db.delete_article(id).await?;
    Ok(ApiResponse::success_msg((), "Article deleted"))
}
