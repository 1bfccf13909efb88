use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// AI analysis for one property, produced by the external collaborator and
/// cached per property. Read-mostly: a cached analysis is returned verbatim
/// until invalidated out of band.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PropertyAiAnalysis {
    pub property_id: Uuid,
    pub confidence_score: f64,
    pub recommended_price: Decimal,
    pub market_analysis: String,
    pub risk_assessment: String,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
