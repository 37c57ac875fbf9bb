pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod status;
pub mod store;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, MethodRouter},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::service::password_digest;
use crate::auth::{CredentialVerifier, Role};
use crate::middleware::{access_control_middleware, AccessControlChain, PolicyTable, RoutePolicy};
use crate::response::Passthrough;
use crate::store::Db;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub chain: Arc<AccessControlChain>,
    pub policies: Arc<PolicyTable>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            db: Db::new(),
            chain: Arc::new(AccessControlChain::new(CredentialVerifier::from_config())),
            policies: Arc::new(routes().policies),
        }
    }

    /// Seed bootstrap data (admin account, default categories/tags).
    pub async fn bootstrap(&self) {
        let security = &config::config().security;
        let digest = (!security.admin_password.is_empty())
            .then(|| password_digest(&security.admin_password));
        self.db.seed(&security.admin_username, digest).await;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Router plus policy table built from one declaration per route, so the two
/// cannot drift apart. The policy is keyed by the same pattern string that is
/// registered on the router.
struct RouteSet {
    router: Router<AppState>,
    policies: PolicyTable,
}

impl RouteSet {
    fn new() -> Self {
        Self { router: Router::new(), policies: PolicyTable::new() }
    }

    fn route(mut self, pattern: &str, policy: RoutePolicy, handler: MethodRouter<AppState>) -> Self {
        self.router = self.router.route(pattern, handler);
        self.policies = self.policies.route(pattern, policy);
        self
    }
}

/// Every route in the API, each declared once with its access policy.
fn routes() -> RouteSet {
    use handlers::{article, auth, category, comment, frontend, tag, user};

    let public = RoutePolicy::public;
    let protected = RoutePolicy::protected;
    let admin = || RoutePolicy::roles([Role::Admin]);

    RouteSet::new()
        .route("/health", public(), get(health))
        // Auth
        .route("/api/auth/login", public(), post(auth::login))
        .route("/api/auth/guest", public(), post(auth::guest))
        .route("/api/auth/profile", protected(), get(auth::profile))
        .route("/api/auth/check", protected(), get(auth::check))
        // Categories
        .route("/api/categories", protected(), get(category::list).post(category::create))
        .route(
            "/api/categories/:id",
            protected(),
            get(category::get).patch(category::update).delete(category::delete),
        )
        // Tags
        .route("/api/tags", protected(), get(tag::list).post(tag::create))
        .route("/api/tags/popular", protected(), get(tag::popular))
        .route(
            "/api/tags/:id",
            protected(),
            get(tag::get).patch(tag::update).delete(tag::delete),
        )
        // Articles
        .route("/api/articles", protected(), get(article::list).post(article::create))
        .route(
            "/api/articles/:id",
            protected(),
            get(article::get).patch(article::update).delete(article::delete),
        )
        // Comments (admin-side moderation)
        .route("/api/comments", protected(), get(comment::list))
        .route("/api/comments/:id/status", protected(), patch(comment::moderate))
        .route("/api/comments/:id", protected(), delete(comment::delete))
        // Users (admin only)
        .route("/api/users", admin(), get(user::list).post(user::create))
        .route(
            "/api/users/:id",
            admin(),
            get(user::get).patch(user::update).delete(user::delete),
        )
        // Public frontend surface
        .route("/api/frontend/categories", public(), get(frontend::categories))
        .route("/api/frontend/categories/popular", public(), get(frontend::popular_categories))
        .route("/api/frontend/tags", public(), get(frontend::tags))
        .route("/api/frontend/tags/popular", public(), get(frontend::popular_tags))
        .route("/api/frontend/articles", public(), get(frontend::articles))
        .route("/api/frontend/articles/:id", public(), get(frontend::article))
        .route(
            "/api/frontend/articles/:id/comments",
            public(),
            get(frontend::comments).post(frontend::create_comment),
        )
}

pub fn app(state: AppState) -> Router {
    routes()
        .router
        .layer(from_fn_with_state(state.clone(), access_control_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Passthrough<Value> {
    Passthrough(json!({ "status": "ok", "name": "blog-api-rust" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_come_from_the_route_declarations() {
        let table = routes().policies;

        assert!(table.lookup("/health").is_public);
        assert!(table.lookup("/api/frontend/articles").is_public);
        assert!(table.lookup("/api/frontend/articles/:id/comments").is_public);

        let categories = table.lookup("/api/categories");
        assert!(!categories.is_public);
        assert!(categories.required_roles.is_none());

        let users = table.lookup("/api/users");
        assert!(!users.is_public);
        assert_eq!(
            users.required_roles.unwrap(),
            std::collections::HashSet::from([Role::Admin])
        );

        // Unregistered patterns fall back to protected
        let unknown = table.lookup("/api/does-not-exist");
        assert!(!unknown.is_public);
    }
}
