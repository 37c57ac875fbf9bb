// Domain entities and their wire DTOs.
//
// Entities live in the store with `chrono` timestamps; wire DTOs render
// timestamps as `YYYY-MM-DD HH:mm:ss` strings with `updatedAt` null until the
// record has actually been updated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::response::format_timestamp;

fn fmt(at: DateTime<Utc>) -> String {
    format_timestamp(at)
}

fn fmt_opt(at: Option<DateTime<Utc>>) -> Option<String> {
    at.map(format_timestamp)
}

// === Users ===

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
    /// Password digest; guest accounts carry none
    pub password_digest: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub last_login_at: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: fmt(user.created_at),
            updated_at: fmt_opt(user.updated_at),
            last_login_at: fmt_opt(user.last_login_at),
        }
    }
}

/// Minimal identity block embedded in login responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

// === Categories ===

#[derive(Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub sort: i32,
    pub is_active: bool,
    pub article_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub sort: i32,
    pub is_active: bool,
    pub article_count: i64,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            sort: category.sort,
            is_active: category.is_active,
            article_count: category.article_count,
            created_at: fmt(category.created_at),
            updated_at: fmt_opt(category.updated_at),
        }
    }
}

// === Tags ===

/// Usage threshold above which a tag counts as popular.
pub const POPULAR_TAG_USAGE: i64 = 5;

#[derive(Debug, Clone)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub usage_count: i64,
    pub sort: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl Tag {
    pub fn is_popular(&self) -> bool {
        self.usage_count >= POPULAR_TAG_USAGE
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
    pub usage_count: i64,
    pub sort: i32,
    pub is_active: bool,
    pub is_popular: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub last_used_at: Option<String>,
}

impl From<&Tag> for TagResponse {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
            usage_count: tag.usage_count,
            sort: tag.sort,
            is_active: tag.is_active,
            is_popular: tag.is_popular(),
            created_at: fmt(tag.created_at),
            updated_at: fmt_opt(tag.updated_at),
            last_used_at: fmt_opt(tag.last_used_at),
        }
    }
}

// === Articles ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Published,
    Deleted,
}

/// Summary auto-cut length when the author does not provide one.
pub const SUMMARY_CUT: usize = 100;

#[derive(Debug, Clone)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub tag_ids: Vec<i64>,
    pub status: ArticleStatus,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Effective summary: explicit one, or the first characters of the body.
    pub fn effective_summary(&self) -> String {
        match &self.summary {
            Some(s) if !s.is_empty() => s.clone(),
            _ => self.content.chars().take(SUMMARY_CUT).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub tag_ids: Vec<i64>,
    pub status: ArticleStatus,
    pub view_count: i64,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub published_at: Option<String>,
}

impl From<&Article> for ArticleResponse {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            summary: article.effective_summary(),
            content: article.content.clone(),
            author_id: article.author_id,
            category_id: article.category_id,
            tag_ids: article.tag_ids.clone(),
            status: article.status,
            view_count: article.view_count,
            created_at: fmt(article.created_at),
            updated_at: fmt_opt(article.updated_at),
            published_at: fmt_opt(article.published_at),
        }
    }
}

// === Comments ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Pending,
    Approved,
    Rejected,
    Spam,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub article_id: i64,
    pub author_name: String,
    pub parent_id: Option<i64>,
    pub status: CommentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub content: String,
    pub article_id: i64,
    pub author_name: String,
    pub parent_id: Option<i64>,
    pub status: CommentStatus,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content.clone(),
            article_id: comment.article_id,
            author_name: comment.author_name.clone(),
            parent_id: comment.parent_id,
            status: comment.status,
            created_at: fmt(comment.created_at),
            updated_at: fmt_opt(comment.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_popularity_threshold() {
        let mut tag = Tag {
            id: 1,
            name: "rust".to_string(),
            usage_count: 4,
            sort: 0,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
            last_used_at: None,
        };
        assert!(!tag.is_popular());
        tag.usage_count = 5;
        assert!(tag.is_popular());
    }

    #[test]
    fn article_summary_falls_back_to_content_cut() {
        let article = Article {
            id: 1,
            title: "t".to_string(),
            summary: None,
            content: "x".repeat(500),
            author_id: 1,
            category_id: None,
            tag_ids: vec![],
            status: ArticleStatus::Draft,
            view_count: 0,
            created_at: Utc::now(),
            updated_at: None,
            published_at: None,
        };
        assert_eq!(article.effective_summary().chars().count(), SUMMARY_CUT);
    }

    #[test]
    fn fresh_record_serializes_null_updated_at() {
        let category = Category {
            id: 1,
            name: "misc".to_string(),
            sort: 0,
            is_active: true,
            article_count: 0,
            created_at: Utc::now(),
            updated_at: None,
        };
        let value = serde_json::to_value(CategoryResponse::from(&category)).unwrap();
        assert!(value["updatedAt"].is_null());
        assert!(!value["createdAt"].as_str().unwrap().is_empty());
    }
}
