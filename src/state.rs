use sqlx::PgPool;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::memory::{
    MemoryMetricsStore, MemoryOrganizationStore, MemoryPropertyStore, MemoryUserStore,
};
use crate::database::postgres::{
    PgMetricsStore, PgOrganizationStore, PgPropertyStore, PgUserStore,
};
use crate::database::store::OrganizationStore;
use crate::services::ai_client::{AiAnalyzer, HeuristicAiAnalyzer, HttpAiAnalyzer};
use crate::services::auth_service::AuthService;
use crate::services::metrics_service::MetricsService;
use crate::services::property_service::PropertyService;

/// Shared application state: config plus the service layer, assembled once at
/// startup and cloned per request (everything inside is reference counted).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub properties: Arc<PropertyService>,
    pub metrics: Arc<MetricsService>,
    pub auth: Arc<AuthService>,
    pub organizations: Arc<dyn OrganizationStore>,
    /// Present only for the Postgres backend; used by /health.
    pub db: Option<PgPool>,
}

impl AppState {
    /// Postgres-backed state for normal deployments.
    pub fn postgres(config: AppConfig, pool: PgPool) -> Self {
        let analyzer = make_analyzer(&config);
        let properties = Arc::new(PropertyService::new(
            Arc::new(PgPropertyStore::new(pool.clone())),
            analyzer,
        ));
        let metrics = Arc::new(MetricsService::new(Arc::new(PgMetricsStore::new(pool.clone()))));
        let auth = Arc::new(AuthService::new(
            Arc::new(PgUserStore::new(pool.clone())),
            config.security.clone(),
        ));
        let organizations: Arc<dyn OrganizationStore> =
            Arc::new(PgOrganizationStore::new(pool.clone()));

        Self {
            config: Arc::new(config),
            properties,
            metrics,
            auth,
            organizations,
            db: Some(pool),
        }
    }

    /// In-memory state: demo mode when DATABASE_URL is absent, and the
    /// backend for the integration tests.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::in_memory_with(
            config,
            Arc::new(MemoryPropertyStore::new()),
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryOrganizationStore::new()),
            Arc::new(MemoryMetricsStore::new()),
        )
    }

    /// In-memory state over caller-supplied stores, so tests can seed data
    /// and keep handles to it.
    pub fn in_memory_with(
        config: AppConfig,
        properties: Arc<MemoryPropertyStore>,
        users: Arc<MemoryUserStore>,
        organizations: Arc<MemoryOrganizationStore>,
        metrics: Arc<MemoryMetricsStore>,
    ) -> Self {
        let analyzer = make_analyzer(&config);
        Self {
            properties: Arc::new(PropertyService::new(properties, analyzer)),
            metrics: Arc::new(MetricsService::new(metrics)),
            auth: Arc::new(AuthService::new(users, config.security.clone())),
            organizations,
            config: Arc::new(config),
            db: None,
        }
    }
}

fn make_analyzer(config: &AppConfig) -> Arc<dyn AiAnalyzer> {
    match HttpAiAnalyzer::new(&config.ai) {
        Ok(client) => Arc::new(client),
        // No collaborator configured: fall back to the deterministic heuristic.
        Err(_) => Arc::new(HeuristicAiAnalyzer),
    }
}
