//! In-memory store backend. Used when no DATABASE_URL is configured (demo
//! mode) and by the integration tests, which drive the full router without a
//! database. Locks are held only for the duration of a map operation, never
//! across an await point.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use super::models::{
    AiPerformanceSnapshot, BusinessMetricsSnapshot, ComplianceStatus, EntityCounts,
    Organization, OrganizationStatusSummary, Property, PropertyAiAnalysis, User,
};
use super::store::{
    MetricsStore, OrganizationStore, PropertyStore, StoreError, UserStore,
};

#[derive(Default)]
pub struct MemoryPropertyStore {
    properties: RwLock<Vec<Property>>,
    analyses: RwLock<HashMap<Uuid, PropertyAiAnalysis>>,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PropertyStore for MemoryPropertyStore {
    async fn insert(&self, property: Property) -> Result<Property, StoreError> {
        let mut properties = self.properties.write().unwrap();
        properties.push(property.clone());
        Ok(property)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Property>, StoreError> {
        let properties = self.properties.read().unwrap();
        Ok(properties.iter().find(|p| p.id == id).cloned())
    }

    async fn save(&self, property: &Property) -> Result<(), StoreError> {
        let mut properties = self.properties.write().unwrap();
        match properties.iter_mut().find(|p| p.id == property.id) {
            Some(slot) => {
                *slot = property.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("property {} not found", property.id))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut properties = self.properties.write().unwrap();
        let before = properties.len();
        properties.retain(|p| p.id != id);
        if properties.len() < before {
            self.analyses.write().unwrap().remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn page(&self, limit: i64, offset: i64) -> Result<(Vec<Property>, i64), StoreError> {
        let properties = self.properties.read().unwrap();
        let total = properties.len() as i64;

        let mut ordered: Vec<Property> = properties.clone();
        ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let page = ordered
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn analysis(&self, property_id: Uuid) -> Result<Option<PropertyAiAnalysis>, StoreError> {
        Ok(self.analyses.read().unwrap().get(&property_id).cloned())
    }

    async fn save_analysis(&self, analysis: &PropertyAiAnalysis) -> Result<(), StoreError> {
        self.analyses
            .write()
            .unwrap()
            .insert(analysis.property_id, analysis.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().unwrap();
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Conflict(format!(
                "user with email {} already exists",
                user.email
            )));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().unwrap();
        Ok(users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryOrganizationStore {
    organizations: RwLock<Vec<Organization>>,
}

impl MemoryOrganizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, organization: Organization) {
        self.organizations.write().unwrap().push(organization);
    }
}

#[async_trait]
impl OrganizationStore for MemoryOrganizationStore {
    async fn status_summary(&self) -> Result<OrganizationStatusSummary, StoreError> {
        let organizations = self.organizations.read().unwrap();
        let mut summary = OrganizationStatusSummary {
            total: organizations.len() as i64,
            ..Default::default()
        };
        for org in organizations.iter() {
            if org.status == "suspended" {
                summary.suspended += 1;
            } else {
                summary.active += 1;
            }
            *summary.by_tier.entry(org.subscription_tier.clone()).or_insert(0) += 1;
        }
        Ok(summary)
    }
}

#[derive(Default)]
pub struct MemoryMetricsStore {
    snapshots: RwLock<Vec<BusinessMetricsSnapshot>>,
    ai: RwLock<Option<AiPerformanceSnapshot>>,
    compliance: RwLock<Option<ComplianceStatus>>,
    /// Entity-creation batches, each carrying the creation timestamp so that
    /// windowed counts behave like `created_at >= since` over real rows.
    counts: RwLock<Vec<(DateTime<Utc>, EntityCounts)>>,
}

impl MemoryMetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_snapshot(&self, snapshot: BusinessMetricsSnapshot) {
        self.snapshots.write().unwrap().push(snapshot);
    }

    pub fn set_ai_snapshot(&self, snapshot: AiPerformanceSnapshot) {
        *self.ai.write().unwrap() = Some(snapshot);
    }

    pub fn set_compliance(&self, status: ComplianceStatus) {
        *self.compliance.write().unwrap() = Some(status);
    }

    /// Records a batch of entities created at `at`.
    pub fn record_counts(&self, at: DateTime<Utc>, counts: EntityCounts) {
        self.counts.write().unwrap().push((at, counts));
    }

    pub fn set_counts(&self, counts: EntityCounts) {
        self.record_counts(Utc::now(), counts);
    }
}

#[async_trait]
impl MetricsStore for MemoryMetricsStore {
    async fn latest_snapshots(
        &self,
    ) -> Result<(Option<BusinessMetricsSnapshot>, Option<BusinessMetricsSnapshot>), StoreError>
    {
        let mut snapshots = self.snapshots.read().unwrap().clone();
        snapshots.sort_by(|a, b| b.report_date.cmp(&a.report_date));
        let mut iter = snapshots.into_iter();
        Ok((iter.next(), iter.next()))
    }

    async fn entity_counts(&self, since: Option<DateTime<Utc>>) -> Result<EntityCounts, StoreError> {
        let batches = self.counts.read().unwrap();
        let mut total = EntityCounts::default();
        for (at, counts) in batches.iter() {
            if since.map_or(true, |s| *at >= s) {
                total.users += counts.users;
                total.properties += counts.properties;
                total.leads += counts.leads;
                total.deals += counts.deals;
                total.active_campaigns += counts.active_campaigns;
            }
        }
        Ok(total)
    }

    async fn ai_snapshot(&self) -> Result<Option<AiPerformanceSnapshot>, StoreError> {
        Ok(self.ai.read().unwrap().clone())
    }

    async fn compliance(&self) -> Result<Option<ComplianceStatus>, StoreError> {
        Ok(self.compliance.read().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn counts(users: i64, deals: i64) -> EntityCounts {
        EntityCounts {
            users,
            deals,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn entity_counts_respect_the_window() {
        let store = MemoryMetricsStore::new();
        let now = Utc::now();
        store.record_counts(now - Duration::days(40), counts(100, 10));
        store.record_counts(now, counts(50, 5));

        let windowed = store
            .entity_counts(Some(now - Duration::days(1)))
            .await
            .unwrap();
        assert_eq!(windowed.users, 50);
        assert_eq!(windowed.deals, 5);

        let unbounded = store.entity_counts(None).await.unwrap();
        assert_eq!(unbounded.users, 150);
        assert_eq!(unbounded.deals, 15);
    }
}
