mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use deelflow_api::config::AppConfig;

use common::TestApp;

#[tokio::test]
async fn root_and_health_respond_with_success_envelope() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.get("/", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert!(body["data"]["version"].is_string());
    assert!(body["timestamp"].is_string());

    let (status, body) = app.get("/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "in-memory");
    Ok(())
}

#[tokio::test]
async fn unknown_route_returns_error_envelope() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.get("/no/such/route", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error_code"], "NOT_FOUND");
    assert!(body["request_id"].is_string());
    assert!(body["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn wrong_method_returns_405() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.request(Method::DELETE, "/stats", None, None).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error_code"], "METHOD_NOT_ALLOWED");
    Ok(())
}

#[tokio::test]
async fn trailing_slash_resolves_to_the_same_route() -> Result<()> {
    let app = TestApp::new();

    let (plain, _) = app.get("/status", None).await?;
    let (slashed, _) = app.get("/status/", None).await?;
    assert_eq!(plain, StatusCode::OK);
    assert_eq!(slashed, StatusCode::OK);

    let (status, body) = app.get("/status/", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["api"], "operational");
    Ok(())
}

#[tokio::test]
async fn cors_headers_follow_the_config_flag() -> Result<()> {
    // Development defaults enable CORS.
    let app = TestApp::new();
    let (status, headers) = app
        .get_headers_with_origin("/health", "http://dashboard.example.com")
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(headers.contains_key("access-control-allow-origin"));

    let mut config = AppConfig::development();
    config.security.enable_cors = false;
    let app = TestApp::with_config(config);
    let (status, headers) = app
        .get_headers_with_origin("/health", "http://dashboard.example.com")
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(!headers.contains_key("access-control-allow-origin"));
    Ok(())
}

#[tokio::test]
async fn status_reports_component_overview() -> Result<()> {
    let app = TestApp::new();
    app.metrics.set_counts(common::entity_counts());

    let (status, body) = app.get("/status", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "in-memory");
    assert_eq!(body["data"]["ai_services"], "heuristic");
    assert_eq!(body["data"]["counts"]["users"], 150);
    assert_eq!(body["data"]["counts"]["properties"], 89);
    Ok(())
}
