use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Property, PropertyAiAnalysis};
use crate::database::store::{PropertyStore, StoreError};

pub struct PgPropertyStore {
    pool: PgPool,
}

impl PgPropertyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyStore for PgPropertyStore {
    async fn insert(&self, property: Property) -> Result<Property, StoreError> {
        let row = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (
                id, address, unit, city, state, zip, county, property_type,
                bedrooms, bathrooms, square_feet, lot_size, year_built,
                purchase_price, arv, repair_estimate, holding_costs,
                transaction_type, assignment_fee, description, seller_notes,
                status, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24
            )
            RETURNING *
            "#,
        )
        .bind(property.id)
        .bind(&property.address)
        .bind(&property.unit)
        .bind(&property.city)
        .bind(&property.state)
        .bind(&property.zip)
        .bind(&property.county)
        .bind(&property.property_type)
        .bind(property.bedrooms)
        .bind(property.bathrooms)
        .bind(property.square_feet)
        .bind(property.lot_size)
        .bind(property.year_built)
        .bind(property.purchase_price)
        .bind(property.arv)
        .bind(property.repair_estimate)
        .bind(property.holding_costs)
        .bind(&property.transaction_type)
        .bind(property.assignment_fee)
        .bind(&property.description)
        .bind(&property.seller_notes)
        .bind(property.status)
        .bind(property.created_at)
        .bind(property.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Property>, StoreError> {
        let row = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, property: &Property) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE properties SET
                address = $2, unit = $3, city = $4, state = $5, zip = $6,
                county = $7, property_type = $8, bedrooms = $9, bathrooms = $10,
                square_feet = $11, lot_size = $12, year_built = $13,
                purchase_price = $14, arv = $15, repair_estimate = $16,
                holding_costs = $17, transaction_type = $18, assignment_fee = $19,
                description = $20, seller_notes = $21, status = $22, updated_at = $23
            WHERE id = $1
            "#,
        )
        .bind(property.id)
        .bind(&property.address)
        .bind(&property.unit)
        .bind(&property.city)
        .bind(&property.state)
        .bind(&property.zip)
        .bind(&property.county)
        .bind(&property.property_type)
        .bind(property.bedrooms)
        .bind(property.bathrooms)
        .bind(property.square_feet)
        .bind(property.lot_size)
        .bind(property.year_built)
        .bind(property.purchase_price)
        .bind(property.arv)
        .bind(property.repair_estimate)
        .bind(property.holding_costs)
        .bind(&property.transaction_type)
        .bind(property.assignment_fee)
        .bind(&property.description)
        .bind(&property.seller_notes)
        .bind(property.status)
        .bind(property.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("property {} not found", property.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn page(&self, limit: i64, offset: i64) -> Result<(Vec<Property>, i64), StoreError> {
        let rows = sqlx::query_as::<_, Property>(
            "SELECT * FROM properties ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM properties")
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    async fn analysis(&self, property_id: Uuid) -> Result<Option<PropertyAiAnalysis>, StoreError> {
        let row = sqlx::query_as::<_, PropertyAiAnalysis>(
            "SELECT * FROM property_ai_analyses WHERE property_id = $1",
        )
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save_analysis(&self, analysis: &PropertyAiAnalysis) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO property_ai_analyses (
                property_id, confidence_score, recommended_price,
                market_analysis, risk_assessment, recommendations, generated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (property_id) DO UPDATE SET
                confidence_score = EXCLUDED.confidence_score,
                recommended_price = EXCLUDED.recommended_price,
                market_analysis = EXCLUDED.market_analysis,
                risk_assessment = EXCLUDED.risk_assessment,
                recommendations = EXCLUDED.recommendations,
                generated_at = EXCLUDED.generated_at
            "#,
        )
        .bind(analysis.property_id)
        .bind(analysis.confidence_score)
        .bind(analysis.recommended_price)
        .bind(&analysis.market_analysis)
        .bind(&analysis.risk_assessment)
        .bind(&analysis.recommendations)
        .bind(analysis.generated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
