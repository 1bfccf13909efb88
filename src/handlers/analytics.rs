use axum::extract::State;
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/v1/analytics/opportunity-cost-analysis
pub async fn opportunity_cost_analysis(State(state): State<AppState>) -> ApiResult<Value> {
    let analysis = state.metrics.opportunity_cost_analysis().await?;

    Ok(ApiResponse::success(
        "Opportunity cost analysis retrieved successfully",
        serde_json::to_value(analysis).unwrap_or(Value::Null),
    ))
}

/// GET /api/organizations/status
pub async fn organization_status(State(state): State<AppState>) -> ApiResult<Value> {
    let summary = state.organizations.status_summary().await.map_err(ApiError::from)?;

    Ok(ApiResponse::success(
        "Organization status retrieved successfully",
        serde_json::to_value(summary).unwrap_or(Value::Null),
    ))
}
