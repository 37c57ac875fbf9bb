// Access control chain: public bypass, credential verification, role gate,
// method gate, in that order. The order is load-bearing: the method gate
// assumes a principal has already been attached by verification.

use std::collections::{HashMap, HashSet};

use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{CredentialVerifier, Principal, Role};
use crate::error::ApiError;
use crate::AppState;

/// Per-route authorization policy, declared at router build time. No ambient
/// metadata: the table is the single source of truth the gates read.
#[derive(Debug, Clone, Default)]
pub struct RoutePolicy {
    pub is_public: bool,
    /// `None` means any authenticated principal is acceptable
    pub required_roles: Option<HashSet<Role>>,
}

impl RoutePolicy {
    pub fn public() -> Self {
        Self { is_public: true, required_roles: None }
    }

    pub fn protected() -> Self {
        Self::default()
    }

    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            is_public: false,
            required_roles: Some(roles.into_iter().collect()),
        }
    }
}

/// Route-pattern → policy mapping built once at startup. Lookups happen on
/// the matched axum path pattern (e.g. `/api/categories/:id`); paths that
/// were never registered default to protected.
#[derive(Debug, Default)]
pub struct PolicyTable {
    routes: HashMap<String, RoutePolicy>,
}

impl PolicyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, pattern: &str, policy: RoutePolicy) -> Self {
        self.routes.insert(pattern.to_string(), policy);
        self
    }

    pub fn lookup(&self, pattern: &str) -> RoutePolicy {
        self.routes.get(pattern).cloned().unwrap_or_else(RoutePolicy::protected)
    }
}

/// Everything a gate may consult: request metadata plus the principal
/// attached by credential verification (absent before that step).
pub struct GateContext<'a> {
    pub policy: &'a RoutePolicy,
    pub method: &'a Method,
    pub principal: Option<&'a Principal>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
    /// This gate is satisfied; continue down the chain
    Pass,
    /// Terminal allow: skip every remaining step, no principal required
    Grant,
    Deny(Denial),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Denial {
    Unauthenticated(String),
    Forbidden(String),
}

impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Unauthenticated(msg) => ApiError::Unauthenticated(msg),
            Denial::Forbidden(msg) => ApiError::Forbidden(msg),
        }
    }
}

pub trait Gate: Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(&self, ctx: &GateContext<'_>) -> Decision;
}

/// Routes marked public skip the rest of the chain entirely, so a missing or
/// malformed credential on a public route can never error.
pub struct PublicBypassGate;

impl Gate for PublicBypassGate {
    fn name(&self) -> &'static str {
        "public-bypass"
    }

    fn evaluate(&self, ctx: &GateContext<'_>) -> Decision {
        if ctx.policy.is_public {
            Decision::Grant
        } else {
            Decision::Pass
        }
    }
}

/// Denies unless the principal's role is in the route's required set. Routes
/// without a declared set accept any authenticated principal.
pub struct RoleGate;

impl Gate for RoleGate {
    fn name(&self) -> &'static str {
        "role"
    }

    fn evaluate(&self, ctx: &GateContext<'_>) -> Decision {
        let Some(required) = &ctx.policy.required_roles else {
            return Decision::Pass;
        };
        match ctx.principal {
            Some(principal) if required.contains(&principal.role) => Decision::Pass,
            Some(_) => Decision::Deny(Denial::Forbidden(
                "Insufficient role for this operation".to_string(),
            )),
            None => Decision::Deny(Denial::Forbidden("Unauthorized access".to_string())),
        }
    }
}

/// Guests are read-only: any method other than GET is denied. Admins are
/// unrestricted. Must run after credential verification.
pub struct MethodGate;

impl Gate for MethodGate {
    fn name(&self) -> &'static str {
        "method"
    }

    fn evaluate(&self, ctx: &GateContext<'_>) -> Decision {
        let Some(principal) = ctx.principal else {
            return Decision::Deny(Denial::Forbidden("Unauthorized access".to_string()));
        };
        match principal.role {
            Role::Admin => Decision::Pass,
            Role::Guest if ctx.method == Method::GET => Decision::Pass,
            Role::Guest => Decision::Deny(Denial::Forbidden(
                "Guests may only perform read operations".to_string(),
            )),
        }
    }
}

/// Ordered gate composition. The bypass gate runs before any credential work;
/// the remaining gates run against the verified principal and short-circuit
/// on the first denial.
pub struct AccessControlChain {
    bypass: PublicBypassGate,
    verifier: CredentialVerifier,
    gates: Vec<Box<dyn Gate>>,
}

impl AccessControlChain {
    pub fn new(verifier: CredentialVerifier) -> Self {
        Self {
            bypass: PublicBypassGate,
            verifier,
            gates: vec![Box::new(RoleGate), Box::new(MethodGate)],
        }
    }

    /// Evaluate the full chain for one request. `Ok(None)` is the public
    /// bypass; `Ok(Some(_))` is an authorized principal; any failure is
    /// terminal for the request.
    pub fn authorize(
        &self,
        policy: &RoutePolicy,
        method: &Method,
        bearer: Option<&str>,
    ) -> Result<Option<Principal>, ApiError> {
        let ctx = GateContext { policy, method, principal: None };
        if self.bypass.evaluate(&ctx) == Decision::Grant {
            return Ok(None);
        }

        let token = bearer.ok_or_else(|| ApiError::unauthenticated("Missing bearer credential"))?;
        let principal = self
            .verifier
            .verify(token)
            .map_err(|e| ApiError::unauthenticated(e.to_string()))?;

        let ctx = GateContext { policy, method, principal: Some(&principal) };
        for gate in &self.gates {
            match gate.evaluate(&ctx) {
                Decision::Pass => {}
                Decision::Grant => break,
                Decision::Deny(denial) => {
                    tracing::debug!(gate = gate.name(), "access denied");
                    return Err(denial.into());
                }
            }
        }
        Ok(Some(principal))
    }
}

/// Pull the token out of `Authorization: Bearer <token>`. Absent or
/// non-bearer headers read as no credential at all.
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Axum middleware wrapping the chain around every route. A denial answers
/// immediately with its error envelope; the handler never runs.
pub async fn access_control_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let pattern = request
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let policy = state.policies.lookup(&pattern);
    let bearer = extract_bearer(request.headers());

    match state.chain.authorize(&policy, request.method(), bearer.as_deref()) {
        Ok(Some(principal)) => {
            request.extensions_mut().insert(principal);
        }
        Ok(None) => {}
        Err(err) => return err.into_response(),
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Claims, Role};
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "chain-test-secret";

    fn chain() -> AccessControlChain {
        AccessControlChain::new(CredentialVerifier::new(SECRET))
    }

    fn token(role: Role) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            username: "someone".to_string(),
            role,
            iat: now,
            exp: now + 3600,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    #[test]
    fn public_route_bypasses_credential_verification() {
        let chain = chain();
        // No credential at all
        let result = chain.authorize(&RoutePolicy::public(), &Method::GET, None);
        assert!(matches!(result, Ok(None)));
        // Garbage credential must not error either
        let result = chain.authorize(&RoutePolicy::public(), &Method::GET, Some("garbage"));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn protected_route_without_credential_is_unauthenticated() {
        let err = chain()
            .authorize(&RoutePolicy::protected(), &Method::GET, None)
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[test]
    fn invalid_credential_is_unauthenticated() {
        let err = chain()
            .authorize(&RoutePolicy::protected(), &Method::GET, Some("garbage"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[test]
    fn guest_may_only_get() {
        let chain = chain();
        let token = token(Role::Guest);
        let policy = RoutePolicy::protected();

        let ok = chain.authorize(&policy, &Method::GET, Some(&token)).unwrap();
        assert_eq!(ok.unwrap().role, Role::Guest);

        for method in [Method::POST, Method::PATCH, Method::PUT, Method::DELETE] {
            let err = chain.authorize(&policy, &method, Some(&token)).unwrap_err();
            assert!(matches!(err, ApiError::Forbidden(_)), "{}", method);
        }
    }

    #[test]
    fn admin_passes_any_method() {
        let chain = chain();
        let token = token(Role::Admin);
        let policy = RoutePolicy::protected();
        for method in [Method::GET, Method::POST, Method::PATCH, Method::DELETE] {
            assert!(chain.authorize(&policy, &method, Some(&token)).is_ok(), "{}", method);
        }
    }

    #[test]
    fn role_gate_enforces_declared_set() {
        let chain = chain();
        let policy = RoutePolicy::roles([Role::Admin]);

        let err = chain
            .authorize(&policy, &Method::GET, Some(&token(Role::Guest)))
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        assert!(chain.authorize(&policy, &Method::GET, Some(&token(Role::Admin))).is_ok());
    }

    #[test]
    fn method_gate_rejects_guest_even_when_role_gate_would_allow() {
        let chain = chain();
        let policy = RoutePolicy::roles([Role::Admin, Role::Guest]);
        let err = chain
            .authorize(&policy, &Method::POST, Some(&token(Role::Guest)))
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn unregistered_pattern_defaults_to_protected() {
        let table = PolicyTable::new().route("/api/frontend/tags", RoutePolicy::public());
        assert!(table.lookup("/api/frontend/tags").is_public);
        assert!(!table.lookup("/api/anything-else").is_public);
    }

    #[test]
    fn bearer_extraction_requires_the_bearer_scheme() {
        let mut headers = HeaderMap::new();
        assert!(extract_bearer(&headers).is_none());

        headers.insert("authorization", "Basic abc".parse().unwrap());
        assert!(extract_bearer(&headers).is_none());

        headers.insert("authorization", "Bearer  ".parse().unwrap());
        assert!(extract_bearer(&headers).is_none());

        headers.insert("authorization", "Bearer tok".parse().unwrap());
        assert_eq!(extract_bearer(&headers).as_deref(), Some("tok"));
    }
}
