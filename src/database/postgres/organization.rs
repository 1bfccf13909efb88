use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::OrganizationStatusSummary;
use crate::database::store::{OrganizationStore, StoreError};

pub struct PgOrganizationStore {
    pool: PgPool,
}

impl PgOrganizationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationStore for PgOrganizationStore {
    async fn status_summary(&self) -> Result<OrganizationStatusSummary, StoreError> {
        let (total, active, suspended) = futures::try_join!(
            async {
                let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM organizations")
                    .fetch_one(&self.pool)
                    .await?;
                Ok::<_, sqlx::Error>(n)
            },
            async {
                let (n,): (i64,) =
                    sqlx::query_as("SELECT COUNT(*) FROM organizations WHERE status <> 'suspended'")
                        .fetch_one(&self.pool)
                        .await?;
                Ok(n)
            },
            async {
                let (n,): (i64,) =
                    sqlx::query_as("SELECT COUNT(*) FROM organizations WHERE status = 'suspended'")
                        .fetch_one(&self.pool)
                        .await?;
                Ok(n)
            },
        )?;

        let tiers: Vec<(String, i64)> = sqlx::query_as(
            "SELECT subscription_tier, COUNT(*) FROM organizations GROUP BY subscription_tier",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(OrganizationStatusSummary {
            total,
            active,
            suspended,
            by_tier: tiers.into_iter().collect(),
        })
    }
}
