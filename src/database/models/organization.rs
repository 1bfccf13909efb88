use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub subscription_tier: String,
    /// "active" or "suspended"; suspended tenants are excluded from the
    /// active count in the status rollup.
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate tenant status reported by GET /api/organizations/status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationStatusSummary {
    pub total: i64,
    pub active: i64,
    pub suspended: i64,
    pub by_tier: std::collections::HashMap<String, i64>,
}
