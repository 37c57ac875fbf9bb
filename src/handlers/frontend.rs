// Public (unauthenticated) surface consumed by the blog frontend. Every
// route here is registered public in the policy table.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::{
    ArticleResponse, ArticleStatus, CategoryResponse, CommentResponse, CommentStatus, TagResponse,
};
use crate::response::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// GET /api/frontend/categories
pub async fn categories(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<CategoryResponse>> {
    let categories = state.db.list_categories(query.search.as_deref()).await;
    Ok(ApiResponse::success(
        categories
            .iter()
            .filter(|c| c.is_active)
            .map(CategoryResponse::from)
            .collect(),
    ))
}

/// GET /api/frontend/categories/popular
pub async fn popular_categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryResponse>> {
    let categories = state.db.popular_categories(10).await;
    Ok(ApiResponse::success(categories.iter().map(CategoryResponse::from).collect()))
}

/// GET /api/frontend/tags
pub async fn tags(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<TagResponse>> {
    let tags = state.db.list_tags(query.search.as_deref()).await;
    Ok(ApiResponse::success(
        tags.iter().filter(|t| t.is_active).map(TagResponse::from).collect(),
    ))
}

/// GET /api/frontend/tags/popular
pub async fn popular_tags(State(state): State<AppState>) -> ApiResult<Vec<TagResponse>> {
    let tags = state.db.popular_tags(10).await;
    Ok(ApiResponse::success(tags.iter().map(TagResponse::from).collect()))
}

/// GET /api/frontend/articles - published articles only
pub async fn articles(State(state): State<AppState>) -> ApiResult<Vec<ArticleResponse>> {
    let articles = state.db.list_articles(Some(ArticleStatus::Published)).await;
    Ok(ApiResponse::success(articles.iter().map(ArticleResponse::from).collect()))
}

/// GET /api/frontend/articles/:id - published article read, bumps views
pub async fn article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ArticleResponse> {
    let article = state.db.read_published_article(id).await?;
    Ok(ApiResponse::success(ArticleResponse::from(&article)))
}

/// GET /api/frontend/articles/:id/comments - approved comments only
pub async fn comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<CommentResponse>> {
    let comments = state.db.list_comments(Some(id), Some(CommentStatus::Approved)).await;
    Ok(ApiResponse::success(comments.iter().map(CommentResponse::from).collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    pub author_name: String,
    pub content: String,
    pub parent_id: Option<i64>,
}

/// POST /api/frontend/articles/:id/comments - visitor comment, lands pending
pub async fn create_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CreateComment>,
) -> ApiResult<CommentResponse> {
    let author = payload.author_name.trim();
    if author.is_empty() || author.chars().count() > 50 {
        return Err(ApiError::validation_failed("Author name must be 1-50 characters"));
    }
    if payload.content.trim().is_empty() {
        return Err(ApiError::validation_failed("Comment content must not be empty"));
    }
    let comment = state
        .db
        .create_comment(id, author.to_string(), payload.content, payload.parent_id)
        .await?;
    Ok(ApiResponse::created(CommentResponse::from(&comment)))
}
