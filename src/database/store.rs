use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::{
    AiPerformanceSnapshot, BusinessMetricsSnapshot, ComplianceStatus, EntityCounts,
    OrganizationStatusSummary, Property, PropertyAiAnalysis, User,
};

/// Errors surfaced by the persistence layer. NotFound and Conflict propagate
/// to the router untouched; everything else is translated to a generic 5xx.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Property persistence. The service layer constructs complete records
/// (ids, timestamps) so that backends persist rows verbatim.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn insert(&self, property: Property) -> Result<Property, StoreError>;

    async fn fetch(&self, id: Uuid) -> Result<Option<Property>, StoreError>;

    /// Full-row update. Fails with NotFound if the id is absent.
    async fn save(&self, property: &Property) -> Result<(), StoreError>;

    /// Hard delete. Returns false when the id was not present.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// One page ordered by creation time (newest first), plus the total count.
    async fn page(&self, limit: i64, offset: i64) -> Result<(Vec<Property>, i64), StoreError>;

    async fn analysis(&self, property_id: Uuid) -> Result<Option<PropertyAiAnalysis>, StoreError>;

    async fn save_analysis(&self, analysis: &PropertyAiAnalysis) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with Conflict when the email is already registered.
    async fn insert(&self, user: User) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn status_summary(&self) -> Result<OrganizationStatusSummary, StoreError>;
}

/// Read side of the metrics tables: snapshots written by a background job
/// plus filtered aggregate counts over the live entity tables.
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Latest snapshot and the one immediately before it, newest first.
    async fn latest_snapshots(
        &self,
    ) -> Result<(Option<BusinessMetricsSnapshot>, Option<BusinessMetricsSnapshot>), StoreError>;

    /// Entity counts, restricted to rows created at or after `since` when given.
    async fn entity_counts(&self, since: Option<DateTime<Utc>>) -> Result<EntityCounts, StoreError>;

    async fn ai_snapshot(&self) -> Result<Option<AiPerformanceSnapshot>, StoreError>;

    async fn compliance(&self) -> Result<Option<ComplianceStatus>, StoreError>;
}
