use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::{Property, PropertyAiAnalysis, PropertyStatus};
use crate::database::store::PropertyStore;
use crate::error::ApiError;
use crate::pagination::{PageMeta, PageParams};

use super::ai_client::AiAnalyzer;

/// Validated input for property creation. Construction happens at the router
/// boundary; by the time this reaches the service, all fields are well typed.
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub address: String,
    pub unit: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub county: String,
    pub property_type: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<Decimal>,
    pub square_feet: Option<i64>,
    pub lot_size: Option<Decimal>,
    pub year_built: Option<i32>,
    pub purchase_price: Option<Decimal>,
    pub arv: Option<Decimal>,
    pub repair_estimate: Option<Decimal>,
    pub holding_costs: Option<Decimal>,
    pub transaction_type: String,
    pub assignment_fee: Option<Decimal>,
    pub description: String,
    pub seller_notes: Option<String>,
}

/// Partial update: a field that is `None` keeps its prior value.
#[derive(Debug, Clone, Default)]
pub struct PropertyPatch {
    pub address: Option<String>,
    pub unit: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<Decimal>,
    pub square_feet: Option<i64>,
    pub lot_size: Option<Decimal>,
    pub year_built: Option<i32>,
    pub purchase_price: Option<Decimal>,
    pub arv: Option<Decimal>,
    pub repair_estimate: Option<Decimal>,
    pub holding_costs: Option<Decimal>,
    pub transaction_type: Option<String>,
    pub assignment_fee: Option<Decimal>,
    pub description: Option<String>,
    pub seller_notes: Option<String>,
    pub status: Option<PropertyStatus>,
}

pub struct PropertyService {
    store: Arc<dyn PropertyStore>,
    analyzer: Arc<dyn AiAnalyzer>,
}

impl PropertyService {
    pub fn new(store: Arc<dyn PropertyStore>, analyzer: Arc<dyn AiAnalyzer>) -> Self {
        Self { store, analyzer }
    }

    pub async fn create(&self, input: NewProperty) -> Result<Property, ApiError> {
        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            address: input.address,
            unit: input.unit,
            city: input.city,
            state: input.state,
            zip: input.zip,
            county: input.county,
            property_type: input.property_type,
            bedrooms: input.bedrooms,
            bathrooms: input.bathrooms,
            square_feet: input.square_feet,
            lot_size: input.lot_size,
            year_built: input.year_built,
            purchase_price: input.purchase_price,
            arv: input.arv,
            repair_estimate: input.repair_estimate,
            holding_costs: input.holding_costs,
            transaction_type: input.transaction_type,
            assignment_fee: input.assignment_fee,
            description: input.description,
            seller_notes: input.seller_notes,
            status: PropertyStatus::Active,
            created_at: now,
            updated_at: now,
        };

        let created = self.store.insert(property).await?;
        tracing::info!(property_id = %created.id, "created property");
        Ok(created)
    }

    pub async fn list(&self, params: PageParams) -> Result<(Vec<Property>, PageMeta), ApiError> {
        let (rows, total) = self.store.page(params.limit, params.offset).await?;
        Ok((rows, PageMeta::new(total, params)))
    }

    pub async fn get(&self, id: Uuid) -> Result<Property, ApiError> {
        self.store
            .fetch(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("property {} not found", id)))
    }

    pub async fn update(&self, id: Uuid, patch: PropertyPatch) -> Result<Property, ApiError> {
        let mut property = self.get(id).await?;

        apply_patch(&mut property, patch);
        property.updated_at = Utc::now();

        self.store.save(&property).await?;
        Ok(property)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        // Repeated delete of the same id reports NotFound, not a silent success.
        if !self.store.delete(id).await? {
            return Err(ApiError::not_found(format!("property {} not found", id)));
        }
        tracing::info!(property_id = %id, "deleted property");
        Ok(())
    }

    /// Cached analysis when present; otherwise one collaborator call, cached
    /// on success. The property itself must exist either way.
    pub async fn ai_analysis(&self, id: Uuid) -> Result<PropertyAiAnalysis, ApiError> {
        let property = self.get(id).await?;

        if let Some(cached) = self.store.analysis(id).await? {
            return Ok(cached);
        }

        let analysis = self.analyzer.analyze(&property).await?;
        self.store.save_analysis(&analysis).await?;
        Ok(analysis)
    }
}

fn apply_patch(property: &mut Property, patch: PropertyPatch) {
    macro_rules! merge {
        ($($field:ident),* $(,)?) => {
            $(if let Some(value) = patch.$field {
                property.$field = value.into();
            })*
        };
    }

    // String fields replace; optional numeric fields are set when supplied.
    if let Some(v) = patch.address {
        property.address = v;
    }
    if let Some(v) = patch.city {
        property.city = v;
    }
    if let Some(v) = patch.state {
        property.state = v;
    }
    if let Some(v) = patch.zip {
        property.zip = v;
    }
    if let Some(v) = patch.county {
        property.county = v;
    }
    if let Some(v) = patch.property_type {
        property.property_type = v;
    }
    if let Some(v) = patch.transaction_type {
        property.transaction_type = v;
    }
    if let Some(v) = patch.description {
        property.description = v;
    }
    if let Some(v) = patch.status {
        property.status = v;
    }
    merge!(
        unit,
        bedrooms,
        bathrooms,
        square_feet,
        lot_size,
        year_built,
        purchase_price,
        arv,
        repair_estimate,
        holding_costs,
        assignment_fee,
        seller_notes,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryPropertyStore;
    use crate::services::ai_client::HeuristicAiAnalyzer;
    use rust_decimal_macros::dec;

    fn service() -> PropertyService {
        PropertyService::new(
            Arc::new(MemoryPropertyStore::new()),
            Arc::new(HeuristicAiAnalyzer),
        )
    }

    fn new_property() -> NewProperty {
        NewProperty {
            address: "1 Main St".to_string(),
            unit: None,
            city: "Atlanta".to_string(),
            state: "GA".to_string(),
            zip: "30301".to_string(),
            county: "Fulton".to_string(),
            property_type: "Single Family".to_string(),
            bedrooms: Some(3),
            bathrooms: Some(dec!(2.5)),
            square_feet: None,
            lot_size: None,
            year_built: Some(1994),
            purchase_price: Some(dec!(100000)),
            arv: Some(dec!(150000)),
            repair_estimate: Some(dec!(20000)),
            holding_costs: Some(dec!(5000)),
            transaction_type: "Wholesale".to_string(),
            assignment_fee: None,
            description: "d".to_string(),
            seller_notes: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_recomputes_profit() {
        let svc = service();
        let created = svc.create(new_property()).await.unwrap();
        assert_eq!(created.potential_profit(), dec!(25000));

        let fetched = svc.get(created.id).await.unwrap();
        assert_eq!(fetched.potential_profit(), dec!(25000));
    }

    #[tokio::test]
    async fn partial_update_touches_only_supplied_fields() {
        let svc = service();
        let created = svc.create(new_property()).await.unwrap();

        let patch = PropertyPatch {
            description: Some("renovated".to_string()),
            ..Default::default()
        };
        let updated = svc.update(created.id, patch).await.unwrap();

        assert_eq!(updated.description, "renovated");
        assert_eq!(updated.address, created.address);
        assert_eq!(updated.purchase_price, created.purchase_price);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_recomputes_profit_from_new_figures() {
        let svc = service();
        let created = svc.create(new_property()).await.unwrap();

        let patch = PropertyPatch {
            repair_estimate: Some(dec!(30000)),
            ..Default::default()
        };
        let updated = svc.update(created.id, patch).await.unwrap();
        assert_eq!(updated.potential_profit(), dec!(15000));
    }

    #[tokio::test]
    async fn delete_is_not_idempotent() {
        let svc = service();
        let created = svc.create(new_property()).await.unwrap();

        svc.delete(created.id).await.unwrap();
        let err = svc.delete(created.id).await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn missing_property_is_not_found() {
        let svc = service();
        let err = svc.get(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn ai_analysis_is_cached_per_property() {
        let svc = service();
        let created = svc.create(new_property()).await.unwrap();

        let first = svc.ai_analysis(created.id).await.unwrap();
        let second = svc.ai_analysis(created.id).await.unwrap();
        assert_eq!(first.generated_at, second.generated_at);
        assert_eq!(first.property_id, created.id);
    }

    #[tokio::test]
    async fn ai_analysis_for_missing_property_is_not_found() {
        let svc = service();
        let err = svc.ai_analysis(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
