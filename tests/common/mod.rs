use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use blog_api_rust::{app, AppState};

/// Build a fresh app with seeded bootstrap data. Tests drive it in-process
/// with `oneshot`, no listener or database required.
pub async fn test_app() -> Router {
    let state = AppState::new();
    state.bootstrap().await;
    app(state)
}

/// Fire one request and decode the JSON body (Null when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await.context("request failed")?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).context("response body is not JSON")?
    };
    Ok((status, value))
}

/// Login with the development-default admin credentials.
pub async fn admin_token(app: &Router) -> Result<String> {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "admin123" })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::OK, "admin login failed: {}", body);
    body["data"]["accessToken"]
        .as_str()
        .map(str::to_string)
        .context("login response carried no accessToken")
}

/// Obtain a read-only guest credential.
pub async fn guest_token(app: &Router) -> Result<String> {
    let (status, body) = send(app, "POST", "/api/auth/guest", None, None).await?;
    anyhow::ensure!(status == StatusCode::OK, "guest access failed: {}", body);
    body["data"]["accessToken"]
        .as_str()
        .map(str::to_string)
        .context("guest response carried no accessToken")
}
