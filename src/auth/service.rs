// Authentication service: admin login, guest token issue, bootstrap.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::auth::{generate_jwt, Claims, Role};
use crate::error::ApiError;
use crate::models::{User, UserSummary};
use crate::store::Db;

/// Payload returned by login and guest-access endpoints.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserSummary,
}

/// Hex SHA-256 digest used for stored passwords.
pub fn password_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn verify_password(user: &User, password: &str) -> bool {
    match &user.password_digest {
        Some(digest) => digest == &password_digest(password),
        None => false,
    }
}

fn issue_token(user: &User) -> Result<LoginResponse, ApiError> {
    let claims = Claims::new(user.id, user.username.clone(), user.role);
    let access_token = generate_jwt(&claims)
        .map_err(|e| ApiError::internal(format!("token generation failed: {}", e)))?;
    Ok(LoginResponse {
        access_token,
        user: UserSummary::from(user),
    })
}

/// Admin login: validate username/password against the active admin account
/// and issue a credential. A wrong username and a wrong password are
/// indistinguishable to the caller.
pub async fn login_admin(db: &Db, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
    let user = db
        .find_user_by_username(username)
        .await
        .filter(|u| u.role == Role::Admin && u.is_active)
        .filter(|u| verify_password(u, password))
        .ok_or_else(|| ApiError::unauthenticated("Invalid username or password"))?;

    db.touch_last_login(user.id).await;
    issue_token(&user)
}

/// Guest access: issue a read-only credential bound to the shared guest
/// account, creating that account on first use.
pub async fn guest_access(db: &Db) -> Result<LoginResponse, ApiError> {
    let user = db.find_or_create_guest().await;
    db.touch_last_login(user.id).await;
    issue_token(&user)
}
