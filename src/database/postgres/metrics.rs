use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::models::{
    AiPerformanceSnapshot, BusinessMetricsSnapshot, ComplianceStatus, EntityCounts,
};
use crate::database::store::{MetricsStore, StoreError};

pub struct PgMetricsStore {
    pool: PgPool,
}

impl PgMetricsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str, since: Option<DateTime<Utc>>) -> Result<i64, sqlx::Error> {
        let (n,): (i64,) = match since {
            Some(ts) => sqlx::query_as(sql).bind(ts).fetch_one(&self.pool).await?,
            // Bind a timestamp far enough back to cover everything so the
            // same statement works for the unbounded case.
            None => {
                sqlx::query_as(sql)
                    .bind(DateTime::<Utc>::UNIX_EPOCH)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(n)
    }
}

#[async_trait]
impl MetricsStore for PgMetricsStore {
    async fn latest_snapshots(
        &self,
    ) -> Result<(Option<BusinessMetricsSnapshot>, Option<BusinessMetricsSnapshot>), StoreError>
    {
        let mut rows = sqlx::query_as::<_, BusinessMetricsSnapshot>(
            "SELECT * FROM business_metrics ORDER BY report_date DESC LIMIT 2",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter();

        Ok((rows.next(), rows.next()))
    }

    async fn entity_counts(&self, since: Option<DateTime<Utc>>) -> Result<EntityCounts, StoreError> {
        let (users, properties, leads, deals, active_campaigns) = futures::try_join!(
            self.count("SELECT COUNT(*) FROM users WHERE created_at >= $1", since),
            self.count("SELECT COUNT(*) FROM properties WHERE created_at >= $1", since),
            self.count("SELECT COUNT(*) FROM leads WHERE created_at >= $1", since),
            self.count("SELECT COUNT(*) FROM deals WHERE created_at >= $1", since),
            self.count(
                "SELECT COUNT(*) FROM campaigns WHERE status = 'active' AND created_at >= $1",
                since,
            ),
        )?;

        Ok(EntityCounts {
            users,
            properties,
            leads,
            deals,
            active_campaigns,
        })
    }

    async fn ai_snapshot(&self) -> Result<Option<AiPerformanceSnapshot>, StoreError> {
        let row = sqlx::query_as::<_, AiPerformanceSnapshot>(
            "SELECT * FROM ai_performance_metrics ORDER BY recorded_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn compliance(&self) -> Result<Option<ComplianceStatus>, StoreError> {
        let row = sqlx::query_as::<_, ComplianceStatus>(
            "SELECT compliance_percent, audit_trail, system_health, updated_at \
             FROM compliance_status ORDER BY updated_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
