use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::models::{CommentResponse, CommentStatus};
use crate::response::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub article_id: Option<i64>,
    pub status: Option<CommentStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ModerateComment {
    pub status: CommentStatus,
}

/// GET /api/comments - moderation listing, filterable by article and status
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<CommentResponse>> {
    let comments = state.db.list_comments(query.article_id, query.status).await;
    Ok(ApiResponse::success(comments.iter().map(CommentResponse::from).collect()))
}

/// PATCH /api/comments/:id/status - approve/reject/mark spam
pub async fn moderate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ModerateComment>,
) -> ApiResult<CommentResponse> {
    let comment = state.db.moderate_comment(id, payload.status).await?;
    Ok(ApiResponse::success_msg(CommentResponse::from(&comment), "Comment moderated"))
}

/// DELETE /api/comments/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    state.db.delete_comment(id).await?;
    Ok(ApiResponse::success_msg((), "Comment deleted"))
}
