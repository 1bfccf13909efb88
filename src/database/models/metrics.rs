use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Point-in-time record of aggregate business figures, written by a background
/// job outside this layer. Dashboard endpoints report the latest snapshot and
/// derive growth against the one before it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BusinessMetricsSnapshot {
    pub id: Uuid,
    pub total_revenue: Decimal,
    pub active_users: i64,
    pub properties_listed: i64,
    pub ai_conversations: i64,
    pub total_deals: i64,
    pub monthly_profit: Decimal,
    pub voice_calls_count: i64,
    pub report_date: NaiveDate,
}

/// AI-performance sub-metrics (vision, NLP, voice, blockchain), recorded
/// alongside the business snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AiPerformanceSnapshot {
    pub id: Uuid,
    pub voice_total_calls: i64,
    pub voice_success_rate: f64,
    pub vision_total_analyses: i64,
    pub vision_accuracy_rate: f64,
    pub nlp_total_processed: i64,
    pub nlp_accuracy_rate: f64,
    pub blockchain_total_txns: i64,
    pub blockchain_success_rate: f64,
    pub recorded_at: DateTime<Utc>,
}

impl AiPerformanceSnapshot {
    /// Mean of the four per-channel accuracy/success rates.
    pub fn overall_accuracy(&self) -> f64 {
        (self.voice_success_rate
            + self.vision_accuracy_rate
            + self.nlp_accuracy_rate
            + self.blockchain_success_rate)
            / 4.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ComplianceStatus {
    pub compliance_percent: Decimal,
    pub audit_trail: String,
    pub system_health: String,
    pub updated_at: DateTime<Utc>,
}

/// Live entity counts over an optional time window.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EntityCounts {
    pub users: i64,
    pub properties: i64,
    pub leads: i64,
    pub deals: i64,
    pub active_campaigns: i64,
}
