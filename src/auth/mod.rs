use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;

pub mod service;

/// Caller role carried in the credential. Every principal has exactly one
/// role for the lifetime of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Guest,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Guest => "guest",
        }
    }
}

/// Authenticated identity for the duration of one request, derived from
/// verified claims. Never persisted; rebuilt per request.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: i64,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: i64, username: String, role: Role) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub,
            username,
            role,
            iat: now.timestamp(),
            exp,
        }
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.username,
            role: claims.role,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential expired")]
    Expired,
    #[error("invalid credential: {0}")]
    Invalid(String),
    #[error("JWT secret not configured")]
    MissingSecret,
}

pub fn generate_jwt(claims: &Claims) -> Result<String, CredentialError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(CredentialError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| CredentialError::Invalid(e.to_string()))
}

/// Stateless bearer-credential verifier: signature plus expiry against the
/// process-wide secret, no storage lookup and no revocation list. A token
/// stays valid until natural expiry.
#[derive(Clone)]
pub struct CredentialVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl CredentialVerifier {
    pub fn from_config() -> Self {
        Self::new(&config::config().security.jwt_secret)
    }

    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Validate signature and expiry and build the request principal straight
    /// from the decoded claims.
    pub fn verify(&self, raw: &str) -> Result<Principal, CredentialError> {
        let token_data = decode::<Claims>(raw, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => CredentialError::Expired,
                _ => CredentialError::Invalid(e.to_string()),
            })?;
        Ok(Principal::from(token_data.claims))
    }
}
