use axum::extract::State;
use chrono::Utc;
use serde_json::{json, Value};

use crate::database::manager;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - service banner
pub async fn root(State(state): State<AppState>) -> ApiResult<Value> {
    Ok(ApiResponse::success(
        "DeelFlow API is running",
        json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "environment": state.config.environment,
        }),
    ))
}

/// GET /health - liveness plus a database ping when one is configured
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    let database = match &state.db {
        Some(pool) => {
            manager::health_check(pool).await.map_err(ApiError::from)?;
            "connected"
        }
        None => "in-memory",
    };

    Ok(ApiResponse::success(
        "Service is healthy",
        json!({
            "status": "ok",
            "database": database,
            "timestamp": Utc::now(),
        }),
    ))
}

/// GET /status - component overview with entity counts
pub async fn status(State(state): State<AppState>) -> ApiResult<Value> {
    let counts = state.metrics.entity_totals().await?;
    let database = if state.db.is_some() { "connected" } else { "in-memory" };

    Ok(ApiResponse::success(
        "Status retrieved successfully",
        json!({
            "api": "operational",
            "database": database,
            "ai_services": if state.config.ai.analysis_url.trim().is_empty() { "heuristic" } else { "configured" },
            "counts": {
                "users": counts.users,
                "properties": counts.properties,
                "leads": counts.leads,
                "deals": counts.deals,
                "active_campaigns": counts.active_campaigns,
            },
        }),
    ))
}
