use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::Layer;
use tower_http::{
    cors::CorsLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};

use crate::error::ApiError;
use crate::handlers::{analytics, auth, dashboard, properties, status};
use crate::middleware::auth::jwt_auth;
use crate::state::AppState;

/// Full application router. Property routes sit behind the JWT middleware;
/// dashboard and analytics endpoints are public, as in the original product.
pub fn router(state: AppState) -> Router {
    let enable_cors = state.config.security.enable_cors;
    let router = Router::new()
        .route("/", get(status::root))
        .route("/health", get(status::health))
        .route("/status", get(status::status))
        .merge(auth_routes(state.clone()))
        .merge(property_routes(state.clone()))
        .merge(dashboard_routes())
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Router wrapped so `/properties` and `/properties/` resolve identically.
pub fn app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(auth::me))
        .route_layer(from_fn_with_state(state, jwt_auth))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
}

fn property_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/properties", get(properties::list).post(properties::create))
        .route(
            "/properties/:id",
            get(properties::get)
                .put(properties::update)
                .delete(properties::delete),
        )
        .route("/properties/:id/ai-analysis", get(properties::ai_analysis))
        .route_layer(from_fn_with_state(state, jwt_auth))
}

fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard::stats))
        .route("/api/total-revenue", get(dashboard::total_revenue))
        .route("/api/active-users", get(dashboard::active_users))
        .route("/api/properties-listed", get(dashboard::properties_listed))
        .route("/api/ai-conversations", get(dashboard::ai_conversations))
        .route("/api/total-deals", get(dashboard::total_deals))
        .route("/api/monthly-profit", get(dashboard::monthly_profit))
        .route("/api/voice-calls-count", get(dashboard::voice_calls_count))
        .route("/api/compliance-status", get(dashboard::compliance_status))
        .route("/api/system-health-metrics", get(dashboard::system_health_metrics))
        .route("/api/vision-analysis", get(dashboard::vision_analysis))
        .route("/api/nlp-processing", get(dashboard::nlp_processing))
        .route("/api/blockchain-txns", get(dashboard::blockchain_txns))
        .route("/api/ai-metrics/overall-accuracy", get(dashboard::overall_accuracy))
        .route(
            "/api/v1/analytics/opportunity-cost-analysis",
            get(analytics::opportunity_cost_analysis),
        )
        .route("/api/organizations/status", get(analytics::organization_status))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Method not allowed for this route".to_string())
}
