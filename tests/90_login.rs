mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn admin_login_returns_token_and_identity() -> Result<()> {
    let app = common::test_app().await;

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "admin123" })),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 200);
    assert!(!body["data"]["accessToken"].as_str().unwrap().is_empty());
    assert_eq!(body["data"]["user"]["role"], "admin");
    assert_eq!(body["data"]["user"]["username"], "admin");
    assert!(body["data"]["user"]["id"].is_i64() || body["data"]["user"]["id"].is_u64());
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_a_handled_unauthorized_outcome() -> Result<()> {
    let app = common::test_app().await;

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "wrong" })),
    )
    .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
    assert!(body["data"].is_null());
    assert!(body["message"].is_string());
    Ok(())
}

#[tokio::test]
async fn empty_credentials_are_a_parameter_error() -> Result<()> {
    let app = common::test_app().await;

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "", "password": "" })),
    )
    .await?;

    // Soft business outcome: parameter invalid rides HTTP 200
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 305);
    Ok(())
}

#[tokio::test]
async fn issued_token_unlocks_protected_routes() -> Result<()> {
    let app = common::test_app().await;
    let token = common::admin_token(&app).await?;

    let (status, body) = common::send(&app, "GET", "/api/auth/profile", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "admin");
    assert_eq!(body["data"]["role"], "admin");

    let (_, body) = common::send(&app, "GET", "/api/auth/check", Some(&token), None).await?;
    assert_eq!(body["data"]["valid"], true);
    Ok(())
}

#[tokio::test]
async fn guest_access_issues_a_read_only_identity() -> Result<()> {
    let app = common::test_app().await;

    let (status, body) = common::send(&app, "POST", "/api/auth/guest", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 200);
    assert_eq!(body["data"]["user"]["role"], "guest");
    assert_eq!(body["data"]["user"]["username"], "guest");
    Ok(())
}
