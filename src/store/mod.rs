// In-memory store standing in for the relational database.
//
// All mutation funnels through the methods here so handlers stay thin; the
// lock scope is one call, which is the consistency unit the handlers expect
// from the real store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::auth::Role;
use crate::error::ApiError;
use crate::models::{
    Article, ArticleStatus, Category, Comment, CommentStatus, Tag, User,
};

#[derive(Default)]
struct Tables {
    users: HashMap<i64, User>,
    categories: HashMap<i64, Category>,
    tags: HashMap<i64, Tag>,
    articles: HashMap<i64, Article>,
    comments: HashMap<i64, Comment>,
    next_id: HashMap<&'static str, i64>,
}

impl Tables {
    fn next(&mut self, table: &'static str) -> i64 {
        let id = self.next_id.entry(table).or_insert(0);
        *id += 1;
        *id
    }
}

#[derive(Clone)]
pub struct Db {
    inner: Arc<RwLock<Tables>>,
}

impl Db {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Tables::default())),
        }
    }

    /// Seed bootstrap data: admin account (with digest), guest account, and
    /// default categories/tags. Idempotent per username/name.
    pub async fn seed(&self, admin_username: &str, admin_digest: Option<String>) {
        let mut t = self.inner.write().await;

        if !t.users.values().any(|u| u.role == Role::Admin && u.is_active) {
            let id = t.next("users");
            t.users.insert(
                id,
                User {
                    id,
                    username: admin_username.to_string(),
                    email: None,
                    nickname: Some("Administrator".to_string()),
                    password_digest: admin_digest,
                    role: Role::Admin,
                    is_active: true,
                    created_at: Utc::now(),
                    updated_at: None,
                    last_login_at: None,
                },
            );
            tracing::info!("seeded admin user '{}'", admin_username);
        }

        for name in ["Frontend", "Backend", "DevOps", "Life"] {
            if !t.categories.values().any(|c| c.name == name) {
                let id = t.next("categories");
                t.categories.insert(
                    id,
                    Category {
                        id,
                        name: name.to_string(),
                        sort: 0,
                        is_active: true,
                        article_count: 0,
                        created_at: Utc::now(),
                        updated_at: None,
                    },
                );
            }
        }

        for name in ["JavaScript", "TypeScript", "Rust", "CSS", "Database"] {
            if !t.tags.values().any(|tag| tag.name == name) {
                let id = t.next("tags");
                t.tags.insert(
                    id,
                    Tag {
                        id,
                        name: name.to_string(),
                        usage_count: 0,
                        sort: 0,
                        is_active: true,
                        created_at: Utc::now(),
                        updated_at: None,
                        last_used_at: None,
                    },
                );
            }
        }
    }

    // === Users ===

    pub async fn find_user(&self, id: i64) -> Result<User, ApiError> {
        self.inner
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("User {} not found", id)))
    }

    pub async fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    pub async fn list_users(&self) -> Vec<User> {
        let t = self.inner.read().await;
        let mut users: Vec<_> = t.users.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        users
    }

    pub async fn create_user(
        &self,
        username: String,
        email: Option<String>,
        nickname: Option<String>,
        password_digest: Option<String>,
        role: Role,
    ) -> Result<User, ApiError> {
        let mut t = self.inner.write().await;
        if t.users.values().any(|u| u.username == username) {
            return Err(ApiError::conflict(format!("User \"{}\" already exists", username)));
        }
        let id = t.next("users");
        let user = User {
            id,
            username,
            email,
            nickname,
            password_digest,
            role,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
            last_login_at: None,
        };
        t.users.insert(id, user.clone());
        Ok(user)
    }

    pub async fn update_user(
        &self,
        id: i64,
        nickname: Option<String>,
        email: Option<String>,
        is_active: Option<bool>,
    ) -> Result<User, ApiError> {
        let mut t = self.inner.write().await;
        let user = t
            .users
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found(format!("User {} not found", id)))?;
        if let Some(nickname) = nickname {
            user.nickname = Some(nickname);
        }
        if let Some(email) = email {
            user.email = Some(email);
        }
        if let Some(is_active) = is_active {
            user.is_active = is_active;
        }
        user.updated_at = Some(Utc::now());
        Ok(user.clone())
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        let mut t = self.inner.write().await;
        let user = t
            .users
            .get(&id)
            .ok_or_else(|| ApiError::not_found(format!("User {} not found", id)))?;
        if user.role == Role::Admin
            && !t
                .users
                .values()
                .any(|u| u.id != id && u.role == Role::Admin && u.is_active)
        {
            return Err(ApiError::business("The last administrator account cannot be deleted"));
        }
        t.users.remove(&id);
        Ok(())
    }

    pub async fn touch_last_login(&self, id: i64) {
        let mut t = self.inner.write().await;
        if let Some(user) = t.users.get_mut(&id) {
            user.last_login_at = Some(Utc::now());
        }
    }

    /// Find the shared guest account, creating it on first guest access.
    pub async fn find_or_create_guest(&self) -> User {
        let mut t = self.inner.write().await;
        if let Some(user) = t.users.values().find(|u| u.role == Role::Guest).cloned() {
            return user;
        }
        let id = t.next("users");
        let user = User {
            id,
            username: "guest".to_string(),
            email: None,
            nickname: Some("Guest".to_string()),
            password_digest: None,
            role: Role::Guest,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
            last_login_at: None,
        };
        t.users.insert(id, user.clone());
        user
    }

    // === Categories ===

    pub async fn create_category(&self, name: String, sort: i32) -> Result<Category, ApiError> {
        let mut t = self.inner.write().await;
        if t.categories.values().any(|c| c.name == name) {
            return Err(ApiError::conflict(format!("Category \"{}\" already exists", name)));
        }
        let id = t.next("categories");
        let category = Category {
            id,
            name,
            sort,
            is_active: true,
            article_count: 0,
            created_at: Utc::now(),
            updated_at: None,
        };
        t.categories.insert(id, category.clone());
        Ok(category)
    }

    pub async fn list_categories(&self, search: Option<&str>) -> Vec<Category> {
        let t = self.inner.read().await;
        let mut categories: Vec<_> = t
            .categories
            .values()
            .filter(|c| match search {
                Some(term) => c.name.to_lowercase().contains(&term.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();
        // Higher sort weight first, then newest id first
        categories.sort_by(|a, b| b.sort.cmp(&a.sort).then(a.id.cmp(&b.id)));
        categories
    }

    pub async fn popular_categories(&self, limit: usize) -> Vec<Category> {
        let t = self.inner.read().await;
        let mut categories: Vec<_> =
            t.categories.values().filter(|c| c.is_active).cloned().collect();
        categories.sort_by(|a, b| b.article_count.cmp(&a.article_count).then(a.id.cmp(&b.id)));
        categories.truncate(limit);
        categories
    }

    pub async fn find_category(&self, id: i64) -> Result<Category, ApiError> {
        self.inner
            .read()
            .await
            .categories
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("Category {} not found", id)))
    }

    pub async fn update_category(
        &self,
        id: i64,
        name: Option<String>,
        sort: Option<i32>,
        is_active: Option<bool>,
    ) -> Result<Category, ApiError> {
        let mut t = self.inner.write().await;
        if let Some(name) = &name {
            if t.categories.values().any(|c| c.id != id && &c.name == name) {
                return Err(ApiError::conflict(format!("Category \"{}\" already exists", name)));
            }
        }
        let category = t
            .categories
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found(format!("Category {} not found", id)))?;
        if let Some(name) = name {
            category.name = name;
        }
        if let Some(sort) = sort {
            category.sort = sort;
        }
        if let Some(is_active) = is_active {
            category.is_active = is_active;
        }
        category.updated_at = Some(Utc::now());
        Ok(category.clone())
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), ApiError> {
        let mut t = self.inner.write().await;
        let category = t
            .categories
            .get(&id)
            .ok_or_else(|| ApiError::not_found(format!("Category {} not found", id)))?;
        if category.article_count > 0 {
            return Err(ApiError::business(
                "Category still has articles and cannot be deleted",
            ));
        }
        t.categories.remove(&id);
        Ok(())
    }

    // === Tags ===

    pub async fn create_tag(&self, name: String, sort: i32) -> Result<Tag, ApiError> {
        let mut t = self.inner.write().await;
        if t.tags.values().any(|tag| tag.name == name) {
            return Err(ApiError::conflict(format!("Tag \"{}\" already exists", name)));
        }
        let id = t.next("tags");
        let tag = Tag {
            id,
            name,
            usage_count: 0,
            sort,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
            last_used_at: None,
        };
        t.tags.insert(id, tag.clone());
        Ok(tag)
    }

    pub async fn list_tags(&self, search: Option<&str>) -> Vec<Tag> {
        let t = self.inner.read().await;
        let mut tags: Vec<_> = t
            .tags
            .values()
            .filter(|tag| match search {
                Some(term) => tag.name.to_lowercase().contains(&term.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();
        tags.sort_by(|a, b| b.sort.cmp(&a.sort).then(a.id.cmp(&b.id)));
        tags
    }

    pub async fn popular_tags(&self, limit: usize) -> Vec<Tag> {
        let t = self.inner.read().await;
        let mut tags: Vec<_> = t.tags.values().filter(|tag| tag.is_active).cloned().collect();
        tags.sort_by(|a, b| b.usage_count.cmp(&a.usage_count).then(a.id.cmp(&b.id)));
        tags.truncate(limit);
        tags
    }

    pub async fn find_tag(&self, id: i64) -> Result<Tag, ApiError> {
        self.inner
            .read()
            .await
            .tags
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("Tag {} not found", id)))
    }

    pub async fn update_tag(
        &self,
        id: i64,
        name: Option<String>,
        sort: Option<i32>,
        is_active: Option<bool>,
    ) -> Result<Tag, ApiError> {
        let mut t = self.inner.write().await;
        if let Some(name) = &name {
            if t.tags.values().any(|tag| tag.id != id && &tag.name == name) {
                return Err(ApiError::conflict(format!("Tag \"{}\" already exists", name)));
            }
        }
        let tag = t
            .tags
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found(format!("Tag {} not found", id)))?;
        if let Some(name) = name {
            tag.name = name;
        }
        if let Some(sort) = sort {
            tag.sort = sort;
        }
        if let Some(is_active) = is_active {
            tag.is_active = is_active;
        }
        tag.updated_at = Some(Utc::now());
        Ok(tag.clone())
    }

    pub async fn delete_tag(&self, id: i64) -> Result<(), ApiError> {
        let mut t = self.inner.write().await;
        if !t.tags.contains_key(&id) {
            return Err(ApiError::not_found(format!("Tag {} not found", id)));
        }
        if t.articles
            .values()
            .any(|a| a.status != ArticleStatus::Deleted && a.tag_ids.contains(&id))
        {
            return Err(ApiError::business("Tag is still in use and cannot be deleted"));
        }
        t.tags.remove(&id);
        Ok(())
    }

    // === Articles ===

    #[allow(clippy::too_many_arguments)]
    pub async fn create_article(
        &self,
        title: String,
        content: String,
        summary: Option<String>,
        author_id: i64,
        category_id: Option<i64>,
        tag_ids: Vec<i64>,
        publish: bool,
    ) -> Result<Article, ApiError> {
        let mut t = self.inner.write().await;

        // Validate every reference before touching any counter, so a bad tag
        // id cannot leave a half-applied update behind.
        if let Some(category_id) = category_id {
            if !t.categories.contains_key(&category_id) {
                return Err(ApiError::not_found(format!("Category {} not found", category_id)));
            }
        }
        for tag_id in &tag_ids {
            if !t.tags.contains_key(tag_id) {
                return Err(ApiError::not_found(format!("Tag {} not found", tag_id)));
            }
        }

        if let Some(category_id) = category_id {
            if let Some(category) = t.categories.get_mut(&category_id) {
                category.article_count += 1;
            }
        }
        let now = Utc::now();
        for tag_id in &tag_ids {
            if let Some(tag) = t.tags.get_mut(tag_id) {
                tag.usage_count += 1;
                tag.last_used_at = Some(now);
            }
        }

        let id = t.next("articles");
        let article = Article {
            id,
            title,
            summary,
            content,
            author_id,
            category_id,
            tag_ids,
            status: if publish { ArticleStatus::Published } else { ArticleStatus::Draft },
            view_count: 0,
            created_at: now,
            updated_at: None,
            published_at: publish.then_some(now),
        };
        t.articles.insert(id, article.clone());
        Ok(article)
    }

    pub async fn list_articles(&self, status: Option<ArticleStatus>) -> Vec<Article> {
        let t = self.inner.read().await;
        let mut articles: Vec<_> = t
            .articles
            .values()
            .filter(|a| match status {
                Some(status) => a.status == status,
                // Soft-deleted articles never show in unfiltered listings
                None => a.status != ArticleStatus::Deleted,
            })
            .cloned()
            .collect();
        articles.sort_by(|a, b| b.id.cmp(&a.id));
        articles
    }

    pub async fn find_article(&self, id: i64) -> Result<Article, ApiError> {
        self.inner
            .read()
            .await
            .articles
            .get(&id)
            .filter(|a| a.status != ArticleStatus::Deleted)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("Article {} not found", id)))
    }

    /// Published-article read for the public surface; bumps the view counter.
    pub async fn read_published_article(&self, id: i64) -> Result<Article, ApiError> {
        let mut t = self.inner.write().await;
        let article = t
            .articles
            .get_mut(&id)
            .filter(|a| a.status == ArticleStatus::Published)
            .ok_or_else(|| ApiError::not_found(format!("Article {} not found", id)))?;
        article.view_count += 1;
        Ok(article.clone())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_article(
        &self,
        id: i64,
        title: Option<String>,
        content: Option<String>,
        summary: Option<String>,
        category_id: Option<Option<i64>>,
        status: Option<ArticleStatus>,
    ) -> Result<Article, ApiError> {
        let mut t = self.inner.write().await;

        // Validate the new category before touching the article
        if let Some(Some(new_category)) = category_id {
            if !t.categories.contains_key(&new_category) {
                return Err(ApiError::not_found(format!("Category {} not found", new_category)));
            }
        }

        let old_category = t
            .articles
            .get(&id)
            .filter(|a| a.status != ArticleStatus::Deleted)
            .ok_or_else(|| ApiError::not_found(format!("Article {} not found", id)))?
            .category_id;

        if let Some(new_category) = category_id {
            if old_category != new_category {
                if let Some(old) = old_category.and_then(|cid| t.categories.get_mut(&cid)) {
                    old.article_count -= 1;
                }
                if let Some(new) = new_category.and_then(|cid| t.categories.get_mut(&cid)) {
                    new.article_count += 1;
                }
            }
        }

        let article = t.articles.get_mut(&id).ok_or_else(|| {
            ApiError::not_found(format!("Article {} not found", id))
        })?;
        if let Some(title) = title {
            article.title = title;
        }
        if let Some(content) = content {
            article.content = content;
        }
        if let Some(summary) = summary {
            article.summary = Some(summary);
        }
        if let Some(new_category) = category_id {
            article.category_id = new_category;
        }
        if let Some(status) = status {
            if status == ArticleStatus::Published && article.status != ArticleStatus::Published {
                article.published_at = Some(Utc::now());
            }
            article.status = status;
        }
        article.updated_at = Some(Utc::now());
        Ok(article.clone())
    }

    /// Soft delete: mark the article deleted and release category/tag counts.
    pub async fn delete_article(&self, id: i64) -> Result<(), ApiError> {
        let mut t = self.inner.write().await;
        let article = t
            .articles
            .get_mut(&id)
            .filter(|a| a.status != ArticleStatus::Deleted)
            .ok_or_else(|| ApiError::not_found(format!("Article {} not found", id)))?;
        article.status = ArticleStatus::Deleted;
        article.updated_at = Some(Utc::now());
        let category_id = article.category_id;
        let tag_ids = article.tag_ids.clone();

        if let Some(category) = category_id.and_then(|cid| t.categories.get_mut(&cid)) {
            category.article_count -= 1;
        }
        for tag_id in tag_ids {
            if let Some(tag) = t.tags.get_mut(&tag_id) {
                tag.usage_count -= 1;
            }
        }
        Ok(())
    }

    // === Comments ===

    pub async fn create_comment(
        &self,
        article_id: i64,
        author_name: String,
        content: String,
        parent_id: Option<i64>,
    ) -> Result<Comment, ApiError> {
        let mut t = self.inner.write().await;
        if !t
            .articles
            .get(&article_id)
            .is_some_and(|a| a.status == ArticleStatus::Published)
        {
            return Err(ApiError::not_found(format!("Article {} not found", article_id)));
        }
        if let Some(parent_id) = parent_id {
            if !t.comments.get(&parent_id).is_some_and(|c| c.article_id == article_id) {
                return Err(ApiError::bad_request("Parent comment does not belong to the article"));
            }
        }
        let id = t.next("comments");
        let comment = Comment {
            id,
            content,
            article_id,
            author_name,
            parent_id,
            status: CommentStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        };
        t.comments.insert(id, comment.clone());
        Ok(comment)
    }

    pub async fn list_comments(
        &self,
        article_id: Option<i64>,
        status: Option<CommentStatus>,
    ) -> Vec<Comment> {
        let t = self.inner.read().await;
        let mut comments: Vec<_> = t
            .comments
            .values()
            .filter(|c| article_id.map_or(true, |aid| c.article_id == aid))
            .filter(|c| status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.id);
        comments
    }

    pub async fn moderate_comment(
        &self,
        id: i64,
        status: CommentStatus,
    ) -> Result<Comment, ApiError> {
        let mut t = self.inner.write().await;
        let comment = t
            .comments
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found(format!("Comment {} not found", id)))?;
        comment.status = status;
        comment.updated_at = Some(Utc::now());
        Ok(comment.clone())
    }

    pub async fn delete_comment(&self, id: i64) -> Result<(), ApiError> {
        let mut t = self.inner.write().await;
        t.comments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found(format!("Comment {} not found", id)))
    }
}

impl Default for Db {
    fn default() -> Self {
        Self::new()
    }
}
