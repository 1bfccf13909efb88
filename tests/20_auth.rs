mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn register_login_me_roundtrip() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "email": "Ada@Example.com",
                "password": "longenough",
                "first_name": "Ada",
                "last_name": "Lovelace",
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    // Emails are normalized to lowercase and hashes never leave the server.
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert!(body["data"]["password_hash"].is_null());

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "ada@example.com", "password": "longenough" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["expires_in"], 3600);
    let access = body["data"]["access_token"].as_str().unwrap().to_string();
    let refresh = body["data"]["refresh_token"].as_str().unwrap().to_string();

    let (status, body) = app.get("/api/auth/me", Some(&access)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@example.com");

    let (status, body) = app
        .post("/api/auth/refresh", None, json!({ "refresh_token": refresh }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["access_token"].is_string());
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() -> Result<()> {
    let app = TestApp::new();
    let user = json!({ "email": "dup@example.com", "password": "longenough" });

    let (status, _) = app.post("/api/auth/register", None, user.clone()).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.post("/api/auth/register", None, user).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_code"], "CONFLICT");
    Ok(())
}

#[tokio::test]
async fn registration_validation_reports_field_errors() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/auth/register", None, json!({ "email": "not-an-email", "password": "short" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["email"].is_string());
    assert!(body["field_errors"]["password"].is_string());
    Ok(())
}

#[tokio::test]
async fn malformed_login_body_gets_the_error_envelope() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.post_raw("/api/auth/login", None, "{]").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert!(body["request_id"].is_string());
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() -> Result<()> {
    let app = TestApp::new();
    app.post(
        "/api/auth/register",
        None,
        json!({ "email": "ada@example.com", "password": "longenough" }),
    )
    .await?;

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "ada@example.com", "password": "wrong" }),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "UNAUTHORIZED");

    // Unknown email yields the identical message so emails cannot be probed.
    let (status2, body2) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "ghost@example.com", "password": "longenough" }),
        )
        .await?;
    assert_eq!(status2, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], body2["message"]);
    Ok(())
}

#[tokio::test]
async fn me_requires_a_bearer_token() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.get("/api/auth/me", None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "UNAUTHORIZED");

    let (status, _) = app.get("/api/auth/me", Some("garbage.token.here")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn access_token_cannot_be_used_as_refresh_token() -> Result<()> {
    let app = TestApp::new();
    let access = app.access_token().await?;

    let (status, _) = app
        .post("/api/auth/refresh", None, json!({ "refresh_token": access }))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
