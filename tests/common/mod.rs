#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::normalize_path::NormalizePath;
use uuid::Uuid;

use deelflow_api::config::AppConfig;
use deelflow_api::database::memory::{
    MemoryMetricsStore, MemoryOrganizationStore, MemoryPropertyStore, MemoryUserStore,
};
use deelflow_api::database::models::{
    AiPerformanceSnapshot, BusinessMetricsSnapshot, ComplianceStatus, EntityCounts, Organization,
};
use deelflow_api::routes;
use deelflow_api::state::AppState;

/// In-process application plus handles to the stores behind it, so tests can
/// seed data directly and then exercise the HTTP surface.
pub struct TestApp {
    app: NormalizePath<Router>,
    pub properties: Arc<MemoryPropertyStore>,
    pub users: Arc<MemoryUserStore>,
    pub organizations: Arc<MemoryOrganizationStore>,
    pub metrics: Arc<MemoryMetricsStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::development())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let properties = Arc::new(MemoryPropertyStore::new());
        let users = Arc::new(MemoryUserStore::new());
        let organizations = Arc::new(MemoryOrganizationStore::new());
        let metrics = Arc::new(MemoryMetricsStore::new());

        let state = AppState::in_memory_with(
            config,
            properties.clone(),
            users.clone(),
            organizations.clone(),
            metrics.clone(),
        );

        Self {
            app: routes::app(state),
            properties,
            users,
            organizations,
            metrics,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .context("router rejected request")?;
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body was not JSON")?
        };

        Ok((status, value))
    }

    /// Sends a body verbatim, bypassing JSON construction, so tests can
    /// exercise malformed payloads.
    pub async fn post_raw(
        &self,
        path: &str,
        token: Option<&str>,
        body: &str,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = builder.body(Body::from(body.to_string()))?;

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .context("router rejected request")?;
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body was not JSON")?
        };

        Ok((status, value))
    }

    /// Response headers for a GET carrying an Origin header, for CORS checks.
    pub async fn get_headers_with_origin(
        &self,
        path: &str,
        origin: &str,
    ) -> Result<(StatusCode, axum::http::HeaderMap)> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .header(header::ORIGIN, origin)
            .body(Body::empty())?;

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .context("router rejected request")?;

        Ok((response.status(), response.headers().clone()))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> Result<(StatusCode, Value)> {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, path, token, None).await
    }

    /// Registers a fresh user and returns a valid access token.
    pub async fn access_token(&self) -> Result<String> {
        let email = format!("user-{}@example.com", Uuid::new_v4());
        let (status, _) = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "email": email,
                    "password": "correct horse battery",
                    "first_name": "Test",
                    "last_name": "User",
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {}", status);

        let (status, body) = self
            .post(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": "correct horse battery" }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {}", status);

        body["data"]["access_token"]
            .as_str()
            .map(str::to_string)
            .context("login response missing access_token")
    }
}

pub fn valid_property(address: &str) -> Value {
    json!({
        "address": address,
        "city": "Atlanta",
        "state": "GA",
        "zip": "30301",
        "county": "Fulton",
        "property_type": "Single Family",
        "transaction_type": "Wholesale",
        "description": "Brick ranch on a quiet street",
        "bedrooms": 3,
        "bathrooms": 2,
        "square_feet": 1450,
        "purchase_price": 100000,
        "arv": 150000,
        "repair_estimate": 20000,
        "holding_costs": 5000,
    })
}

pub fn business_snapshot(date: &str, revenue: Decimal, profit: Decimal) -> BusinessMetricsSnapshot {
    BusinessMetricsSnapshot {
        id: Uuid::new_v4(),
        total_revenue: revenue,
        active_users: 150,
        properties_listed: 89,
        ai_conversations: 1200,
        total_deals: 45,
        monthly_profit: profit,
        voice_calls_count: 320,
        report_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date"),
    }
}

pub fn ai_snapshot() -> AiPerformanceSnapshot {
    AiPerformanceSnapshot {
        id: Uuid::new_v4(),
        voice_total_calls: 320,
        voice_success_rate: 92.0,
        vision_total_analyses: 540,
        vision_accuracy_rate: 88.0,
        nlp_total_processed: 2100,
        nlp_accuracy_rate: 90.0,
        blockchain_total_txns: 75,
        blockchain_success_rate: 98.0,
        recorded_at: Utc::now(),
    }
}

pub fn compliance_ok() -> ComplianceStatus {
    ComplianceStatus {
        compliance_percent: Decimal::from(97),
        audit_trail: "enabled".to_string(),
        system_health: "healthy".to_string(),
        updated_at: Utc::now(),
    }
}

pub fn entity_counts() -> EntityCounts {
    EntityCounts {
        users: 150,
        properties: 89,
        leads: 90,
        deals: 45,
        active_campaigns: 3,
    }
}

pub fn organization(name: &str, tier: &str, status: &str) -> Organization {
    let now = Utc::now();
    Organization {
        id: Uuid::new_v4(),
        name: name.to_string(),
        subscription_tier: tier.to_string(),
        status: status.to_string(),
        created_at: now,
        updated_at: now,
    }
}
