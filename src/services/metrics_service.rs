use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;

use crate::database::models::{BusinessMetricsSnapshot, EntityCounts};
use crate::database::store::MetricsStore;
use crate::error::ApiError;

/// Reporting window for dashboard aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Week,
    Month,
    Quarter,
    Year,
    All,
}

impl Period {
    /// Start of the window, or None for an unbounded window.
    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Period::Today => Some(now - Duration::days(1)),
            Period::Week => Some(now - Duration::weeks(1)),
            Period::Month => Some(now - Duration::days(30)),
            Period::Quarter => Some(now - Duration::days(90)),
            Period::Year => Some(now - Duration::days(365)),
            Period::All => None,
        }
    }
}

impl FromStr for Period {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(Period::Today),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "quarter" => Ok(Period::Quarter),
            "year" => Ok(Period::Year),
            "all" => Ok(Period::All),
            other => Err(ApiError::validation(format!(
                "unknown period '{}' (expected today, week, month, quarter, year or all)",
                other
            ))),
        }
    }
}

/// `(current − previous) / previous × 100`, rounded to two decimals.
/// A missing or zero previous value reports 0 rather than dividing.
pub fn change_percentage(current: Decimal, previous: Option<Decimal>) -> Decimal {
    match previous {
        Some(prev) if !prev.is_zero() => ((current - prev) / prev * dec!(100)).round_dp(2),
        _ => Decimal::ZERO,
    }
}

/// A single dashboard figure with its growth against the prior snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct MetricValue {
    pub value: Decimal,
    pub change_percentage: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct AiMetricsReport {
    pub voice_success_rate: f64,
    pub vision_accuracy: f64,
    pub nlp_accuracy: f64,
    pub blockchain_success_rate: f64,
    pub overall_accuracy: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub period: Period,
    pub total_users: i64,
    pub total_properties: i64,
    pub total_leads: i64,
    pub total_deals: i64,
    pub active_campaigns: i64,
    pub revenue: MetricValue,
    pub monthly_profit: MetricValue,
    pub voice_calls: MetricValue,
    pub ai_conversations: MetricValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_metrics: Option<AiMetricsReport>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpportunityCostAnalysis {
    pub total_revenue: Decimal,
    pub monthly_profit: Decimal,
    pub properties_listed: i64,
    pub total_deals: i64,
    pub opportunity_cost: Decimal,
    pub efficiency_score: f64,
    pub recommendations: Vec<String>,
}

/// Snapshot-backed figures served by the single-purpose dashboard endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotMetric {
    TotalRevenue,
    ActiveUsers,
    PropertiesListed,
    AiConversations,
    TotalDeals,
    MonthlyProfit,
    VoiceCallsCount,
}

impl SnapshotMetric {
    pub fn key(self) -> &'static str {
        match self {
            SnapshotMetric::TotalRevenue => "total_revenue",
            SnapshotMetric::ActiveUsers => "active_users",
            SnapshotMetric::PropertiesListed => "properties_listed",
            SnapshotMetric::AiConversations => "ai_conversations",
            SnapshotMetric::TotalDeals => "total_deals",
            SnapshotMetric::MonthlyProfit => "monthly_profit",
            SnapshotMetric::VoiceCallsCount => "voice_calls_count",
        }
    }

    fn read(self, snapshot: &BusinessMetricsSnapshot) -> Decimal {
        match self {
            SnapshotMetric::TotalRevenue => snapshot.total_revenue,
            SnapshotMetric::ActiveUsers => Decimal::from(snapshot.active_users),
            SnapshotMetric::PropertiesListed => Decimal::from(snapshot.properties_listed),
            SnapshotMetric::AiConversations => Decimal::from(snapshot.ai_conversations),
            SnapshotMetric::TotalDeals => Decimal::from(snapshot.total_deals),
            SnapshotMetric::MonthlyProfit => snapshot.monthly_profit,
            SnapshotMetric::VoiceCallsCount => Decimal::from(snapshot.voice_calls_count),
        }
    }
}

pub struct MetricsService {
    store: Arc<dyn MetricsStore>,
}

impl MetricsService {
    pub fn new(store: Arc<dyn MetricsStore>) -> Self {
        Self { store }
    }

    pub async fn dashboard_stats(
        &self,
        period: Period,
        include_ai_metrics: bool,
    ) -> Result<DashboardStats, ApiError> {
        let now = Utc::now();
        let counts = self.store.entity_counts(period.since(now)).await?;
        let (latest, previous) = self.store.latest_snapshots().await?;

        let figure = |metric: SnapshotMetric| -> MetricValue {
            let current = latest.as_ref().map(|s| metric.read(s)).unwrap_or_default();
            let prior = previous.as_ref().map(|s| metric.read(s));
            MetricValue {
                value: current,
                change_percentage: change_percentage(current, prior),
            }
        };

        let ai_metrics = if include_ai_metrics {
            self.store.ai_snapshot().await?.map(|s| AiMetricsReport {
                voice_success_rate: s.voice_success_rate,
                vision_accuracy: s.vision_accuracy_rate,
                nlp_accuracy: s.nlp_accuracy_rate,
                blockchain_success_rate: s.blockchain_success_rate,
                overall_accuracy: s.overall_accuracy(),
            })
        } else {
            None
        };

        Ok(DashboardStats {
            period,
            total_users: counts.users,
            total_properties: counts.properties,
            total_leads: counts.leads,
            total_deals: counts.deals,
            active_campaigns: counts.active_campaigns,
            revenue: figure(SnapshotMetric::TotalRevenue),
            monthly_profit: figure(SnapshotMetric::MonthlyProfit),
            voice_calls: figure(SnapshotMetric::VoiceCallsCount),
            ai_conversations: figure(SnapshotMetric::AiConversations),
            ai_metrics,
            last_updated: now,
        })
    }

    /// One figure plus its change percentage, shaped for the single-purpose
    /// dashboard endpoints: `{"<metric>": value, "change_percentage": pct}`.
    pub async fn snapshot_metric(&self, metric: SnapshotMetric) -> Result<Value, ApiError> {
        let (latest, previous) = self.store.latest_snapshots().await?;
        let current = latest.as_ref().map(|s| metric.read(s)).unwrap_or_default();
        let prior = previous.as_ref().map(|s| metric.read(s));

        let mut body = serde_json::Map::new();
        body.insert(metric.key().to_string(), json!(current));
        body.insert(
            "change_percentage".to_string(),
            json!(change_percentage(current, prior)),
        );
        Ok(Value::Object(body))
    }

    pub async fn ai_performance(&self) -> Result<Value, ApiError> {
        let snapshot = self.store.ai_snapshot().await?;
        Ok(match snapshot {
            Some(s) => json!({
                "voice": { "total_calls": s.voice_total_calls, "success_rate": s.voice_success_rate },
                "vision": { "total_analyses": s.vision_total_analyses, "accuracy_rate": s.vision_accuracy_rate },
                "nlp": { "total_processed": s.nlp_total_processed, "accuracy_rate": s.nlp_accuracy_rate },
                "blockchain": { "total_txns": s.blockchain_total_txns, "success_rate": s.blockchain_success_rate },
                "overall_accuracy": s.overall_accuracy(),
                "recorded_at": s.recorded_at,
            }),
            None => json!({
                "voice": { "total_calls": 0, "success_rate": 0.0 },
                "vision": { "total_analyses": 0, "accuracy_rate": 0.0 },
                "nlp": { "total_processed": 0, "accuracy_rate": 0.0 },
                "blockchain": { "total_txns": 0, "success_rate": 0.0 },
                "overall_accuracy": 0.0,
                "recorded_at": Value::Null,
            }),
        })
    }

    pub async fn compliance_status(&self) -> Result<Value, ApiError> {
        let status = self.store.compliance().await?;
        Ok(match status {
            Some(s) => json!({
                "compliance_percent": s.compliance_percent,
                "audit_trail": s.audit_trail,
                "system_health": s.system_health,
                "last_updated": s.updated_at,
            }),
            None => json!({
                "compliance_percent": 0,
                "audit_trail": "",
                "system_health": "unknown",
                "last_updated": Value::Null,
            }),
        })
    }

    /// All-time entity totals, used by the component status endpoint.
    pub async fn entity_totals(&self) -> Result<EntityCounts, ApiError> {
        Ok(self.store.entity_counts(None).await?)
    }

    pub async fn opportunity_cost_analysis(&self) -> Result<OpportunityCostAnalysis, ApiError> {
        let (latest, _) = self.store.latest_snapshots().await?;
        let counts = self.store.entity_counts(None).await?;

        let snapshot = latest.unwrap_or_else(empty_snapshot);
        let score = efficiency_score(&snapshot, &counts);

        Ok(OpportunityCostAnalysis {
            total_revenue: snapshot.total_revenue,
            monthly_profit: snapshot.monthly_profit,
            properties_listed: snapshot.properties_listed,
            total_deals: snapshot.total_deals,
            opportunity_cost: (snapshot.total_revenue * dec!(0.10)).round_dp(2),
            efficiency_score: score,
            recommendations: recommendations_for(score),
        })
    }
}

fn empty_snapshot() -> BusinessMetricsSnapshot {
    BusinessMetricsSnapshot {
        id: uuid::Uuid::nil(),
        total_revenue: Decimal::ZERO,
        active_users: 0,
        properties_listed: 0,
        ai_conversations: 0,
        total_deals: 0,
        monthly_profit: Decimal::ZERO,
        voice_calls_count: 0,
        report_date: Utc::now().date_naive(),
    }
}

/// Weighted blend of conversion and profit sub-scores, each clamped to 0..=100:
/// 0.4 × deal conversion + 0.3 × profit margin + 0.3 × listing utilization.
pub fn efficiency_score(snapshot: &BusinessMetricsSnapshot, counts: &EntityCounts) -> f64 {
    let ratio = |num: f64, den: f64| -> f64 {
        if den <= 0.0 {
            0.0
        } else {
            (num / den * 100.0).clamp(0.0, 100.0)
        }
    };

    let deal_conversion = ratio(counts.deals as f64, counts.leads as f64);
    let profit_margin = ratio(
        snapshot.monthly_profit.to_f64().unwrap_or(0.0),
        snapshot.total_revenue.to_f64().unwrap_or(0.0),
    );
    let listing_utilization = ratio(snapshot.total_deals as f64, snapshot.properties_listed as f64);

    0.4 * deal_conversion + 0.3 * profit_margin + 0.3 * listing_utilization
}

/// Templated recommendations selected by threshold on the efficiency score.
pub fn recommendations_for(score: f64) -> Vec<String> {
    if score < 40.0 {
        vec![
            "Increase lead conversion rate by 15%".to_string(),
            "Optimize property listing strategy".to_string(),
            "Improve deal closing timeline".to_string(),
        ]
    } else if score < 70.0 {
        vec![
            "Optimize property listing strategy".to_string(),
            "Improve deal closing timeline".to_string(),
        ]
    } else {
        vec!["Maintain current conversion strategy".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryMetricsStore;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn snapshot(date: &str, revenue: Decimal, profit: Decimal) -> BusinessMetricsSnapshot {
        BusinessMetricsSnapshot {
            id: Uuid::new_v4(),
            total_revenue: revenue,
            active_users: 150,
            properties_listed: 89,
            ai_conversations: 1200,
            total_deals: 45,
            monthly_profit: profit,
            voice_calls_count: 320,
            report_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    #[test]
    fn period_parsing() {
        assert_eq!("month".parse::<Period>().unwrap(), Period::Month);
        assert_eq!("all".parse::<Period>().unwrap(), Period::All);
        assert!("fortnight".parse::<Period>().is_err());
    }

    #[test]
    fn period_window() {
        let now = Utc::now();
        assert!(Period::All.since(now).is_none());
        assert_eq!(Period::Week.since(now), Some(now - Duration::weeks(1)));
    }

    #[test]
    fn change_percentage_handles_zero_previous() {
        assert_eq!(change_percentage(dec!(100), None), Decimal::ZERO);
        assert_eq!(change_percentage(dec!(100), Some(Decimal::ZERO)), Decimal::ZERO);
        assert_eq!(change_percentage(dec!(110), Some(dec!(100))), dec!(10.00));
        assert_eq!(change_percentage(dec!(90), Some(dec!(100))), dec!(-10.00));
    }

    #[test]
    fn efficiency_score_is_clamped_and_weighted() {
        let snap = snapshot("2026-08-01", dec!(100000), dec!(25000));
        let counts = EntityCounts {
            users: 10,
            properties: 89,
            leads: 90,
            deals: 45,
            active_campaigns: 3,
        };
        let score = efficiency_score(&snap, &counts);
        // 0.4*50 + 0.3*25 + 0.3*(45/89*100)
        assert!((score - (20.0 + 7.5 + 0.3 * (45.0 / 89.0 * 100.0))).abs() < 1e-9);

        let zero = efficiency_score(&empty_snapshot(), &EntityCounts::default());
        assert_eq!(zero, 0.0);
    }

    #[test]
    fn recommendation_thresholds() {
        assert_eq!(recommendations_for(10.0).len(), 3);
        assert_eq!(recommendations_for(55.0).len(), 2);
        assert_eq!(recommendations_for(85.0).len(), 1);
    }

    #[tokio::test]
    async fn snapshot_metric_growth_against_previous() {
        let store = Arc::new(MemoryMetricsStore::new());
        store.push_snapshot(snapshot("2026-08-01", dec!(100000), dec!(20000)));
        store.push_snapshot(snapshot("2026-08-02", dec!(110000), dec!(22000)));

        let service = MetricsService::new(store);
        let body = service.snapshot_metric(SnapshotMetric::TotalRevenue).await.unwrap();
        assert_eq!(body["total_revenue"], json!(110000.0));
        assert_eq!(body["change_percentage"], json!(10.0));
    }

    #[tokio::test]
    async fn snapshot_metric_without_history_reports_zero_change() {
        let store = Arc::new(MemoryMetricsStore::new());
        store.push_snapshot(snapshot("2026-08-02", dec!(5000), dec!(1000)));

        let service = MetricsService::new(store);
        let body = service.snapshot_metric(SnapshotMetric::MonthlyProfit).await.unwrap();
        assert_eq!(body["monthly_profit"], json!(1000.0));
        assert_eq!(body["change_percentage"], json!(0.0));
    }

    #[tokio::test]
    async fn opportunity_cost_is_ten_percent_of_revenue() {
        let store = Arc::new(MemoryMetricsStore::new());
        store.push_snapshot(snapshot("2026-08-02", dec!(125000.50), dec!(25000.75)));

        let service = MetricsService::new(store);
        let analysis = service.opportunity_cost_analysis().await.unwrap();
        assert_eq!(analysis.opportunity_cost, dec!(12500.05));
        assert!(!analysis.recommendations.is_empty());
    }
}
