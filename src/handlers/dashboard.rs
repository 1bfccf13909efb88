use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::extract::Query;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::metrics_service::{Period, SnapshotMetric};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub period: Option<String>,
    pub include_ai_metrics: Option<bool>,
}

/// GET /stats?period=&include_ai_metrics=
pub async fn stats(State(state): State<AppState>, Query(query): Query<StatsQuery>) -> ApiResult<Value> {
    let period = match query.period.as_deref() {
        Some(raw) => raw.parse::<Period>()?,
        None => Period::Month,
    };
    let include_ai_metrics = query.include_ai_metrics.unwrap_or(false);

    let stats = state.metrics.dashboard_stats(period, include_ai_metrics).await?;

    Ok(ApiResponse::success(
        "Dashboard statistics retrieved successfully",
        serde_json::to_value(stats).unwrap_or(Value::Null),
    ))
}

async fn snapshot_metric(state: &AppState, metric: SnapshotMetric) -> ApiResult<Value> {
    let body = state.metrics.snapshot_metric(metric).await?;
    Ok(ApiResponse::success("Metric retrieved successfully", body))
}

/// GET /api/total-revenue
pub async fn total_revenue(State(state): State<AppState>) -> ApiResult<Value> {
    snapshot_metric(&state, SnapshotMetric::TotalRevenue).await
}

/// GET /api/active-users
pub async fn active_users(State(state): State<AppState>) -> ApiResult<Value> {
    snapshot_metric(&state, SnapshotMetric::ActiveUsers).await
}

/// GET /api/properties-listed
pub async fn properties_listed(State(state): State<AppState>) -> ApiResult<Value> {
    snapshot_metric(&state, SnapshotMetric::PropertiesListed).await
}

/// GET /api/ai-conversations
pub async fn ai_conversations(State(state): State<AppState>) -> ApiResult<Value> {
    snapshot_metric(&state, SnapshotMetric::AiConversations).await
}

/// GET /api/total-deals
pub async fn total_deals(State(state): State<AppState>) -> ApiResult<Value> {
    snapshot_metric(&state, SnapshotMetric::TotalDeals).await
}

/// GET /api/monthly-profit
pub async fn monthly_profit(State(state): State<AppState>) -> ApiResult<Value> {
    snapshot_metric(&state, SnapshotMetric::MonthlyProfit).await
}

/// GET /api/voice-calls-count
pub async fn voice_calls_count(State(state): State<AppState>) -> ApiResult<Value> {
    snapshot_metric(&state, SnapshotMetric::VoiceCallsCount).await
}

/// GET /api/compliance-status
pub async fn compliance_status(State(state): State<AppState>) -> ApiResult<Value> {
    let body = state.metrics.compliance_status().await?;
    Ok(ApiResponse::success("Compliance status retrieved successfully", body))
}

/// GET /api/system-health-metrics
pub async fn system_health_metrics(State(state): State<AppState>) -> ApiResult<Value> {
    let compliance = state.metrics.compliance_status().await?;
    let counts = state.metrics.entity_totals().await?;

    Ok(ApiResponse::success(
        "System health metrics retrieved successfully",
        json!({
            "system_health": compliance["system_health"],
            "compliance_percent": compliance["compliance_percent"],
            "entities": {
                "users": counts.users,
                "properties": counts.properties,
                "leads": counts.leads,
                "deals": counts.deals,
            },
        }),
    ))
}

/// GET /api/vision-analysis
pub async fn vision_analysis(State(state): State<AppState>) -> ApiResult<Value> {
    let report = state.metrics.ai_performance().await?;
    Ok(ApiResponse::success(
        "Vision analysis metrics retrieved successfully",
        report["vision"].clone(),
    ))
}

/// GET /api/nlp-processing
pub async fn nlp_processing(State(state): State<AppState>) -> ApiResult<Value> {
    let report = state.metrics.ai_performance().await?;
    Ok(ApiResponse::success(
        "NLP processing metrics retrieved successfully",
        report["nlp"].clone(),
    ))
}

/// GET /api/blockchain-txns
pub async fn blockchain_txns(State(state): State<AppState>) -> ApiResult<Value> {
    let report = state.metrics.ai_performance().await?;
    Ok(ApiResponse::success(
        "Blockchain transaction metrics retrieved successfully",
        report["blockchain"].clone(),
    ))
}

/// GET /api/ai-metrics/overall-accuracy
pub async fn overall_accuracy(State(state): State<AppState>) -> ApiResult<Value> {
    let report = state.metrics.ai_performance().await?;
    Ok(ApiResponse::success(
        "Overall AI accuracy retrieved successfully",
        json!({ "overall_accuracy": report["overall_accuracy"] }),
    ))
}
